//! Page content singletons and the visit counter

use super::session::SessionStorage;
use crate::database::{AchievementsData, HeroContent, ResumeData, SharedBackend, SiteStats};
use crate::error::Result;
use chrono::Utc;

/// Resume, achievements and landing header
#[derive(Clone)]
pub struct ContentService {
    backend: SharedBackend,
}

impl ContentService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub async fn get_resume(&self) -> Result<ResumeData> {
        self.backend.get_resume().await
    }

    /// Overwrite the resume in both languages
    pub async fn update_resume(&self, content: String, content_en: String) -> Result<ResumeData> {
        let resume = ResumeData {
            content,
            content_en,
            last_updated: Utc::now(),
        };

        self.backend.put_resume(&resume).await?;
        tracing::info!("Resume updated");

        Ok(resume)
    }

    pub async fn get_achievements(&self) -> Result<AchievementsData> {
        self.backend.get_achievements().await
    }

    pub async fn update_achievements(
        &self,
        content: String,
        content_en: String,
    ) -> Result<AchievementsData> {
        let achievements = AchievementsData {
            content,
            content_en,
            last_updated: Utc::now(),
        };

        self.backend.put_achievements(&achievements).await?;
        tracing::info!("Achievements updated");

        Ok(achievements)
    }

    pub async fn get_hero(&self) -> Result<HeroContent> {
        self.backend.get_hero().await
    }

    pub async fn update_hero(&self, hero: HeroContent) -> Result<HeroContent> {
        self.backend.put_hero(&hero).await?;
        tracing::info!("Hero content updated");
        Ok(hero)
    }
}

/// Page view counter, bumped once per session
#[derive(Clone)]
pub struct VisitCounter {
    backend: SharedBackend,
}

impl VisitCounter {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub async fn views(&self) -> Result<u64> {
        Ok(self.backend.get_stats().await?.unwrap_or_default().views)
    }

    /// Count this session's first visit and return the current total.
    ///
    /// Read, increment and write are separate steps, so concurrent first
    /// visits can lose an increment.
    pub async fn record_visit(&self, session: &SessionStorage) -> Result<u64> {
        if session.has_visited().await {
            return self.views().await;
        }

        let current = self.views().await?;
        self.backend
            .put_stats(&SiteStats {
                views: current + 1,
            })
            .await?;
        session.mark_visited().await;

        let views = self.views().await?;
        tracing::debug!("Visit recorded, total views: {}", views);

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Lang;
    use crate::services::test_support::memory_backend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_documents_read_as_defaults() {
        let service = ContentService::new(memory_backend().await);

        assert!(service.get_resume().await.unwrap().content.is_empty());
        assert_eq!(service.get_hero().await.unwrap(), HeroContent::default());
    }

    #[tokio::test]
    async fn test_resume_overwrite_and_language() {
        let service = ContentService::new(memory_backend().await);

        service
            .update_resume("Türkçe".to_string(), "English".to_string())
            .await
            .unwrap();
        let saved = service
            .update_resume("Yalnız Türkçe".to_string(), String::new())
            .await
            .unwrap();

        let resume = service.get_resume().await.unwrap();
        assert_eq!(resume, saved);
        assert_eq!(resume.content_for(Lang::En), "Yalnız Türkçe");
        assert_eq!(resume.content_for(Lang::Tr), "Yalnız Türkçe");
    }

    #[tokio::test]
    async fn test_update_hero() {
        let service = ContentService::new(memory_backend().await);

        let hero = HeroContent {
            title: "Başlık".to_string(),
            subtitle: "Alt".to_string(),
            image_url: "/hero.jpg".to_string(),
        };
        service.update_hero(hero.clone()).await.unwrap();

        assert_eq!(service.get_hero().await.unwrap(), hero);
    }

    #[tokio::test]
    async fn test_record_visit_once_per_session() {
        let backend = memory_backend().await;
        let counter = VisitCounter::new(backend);
        let temp_dir = TempDir::new().unwrap();

        let first = SessionStorage::new(temp_dir.path().join("s1"));
        assert_eq!(counter.record_visit(&first).await.unwrap(), 1);
        assert_eq!(counter.record_visit(&first).await.unwrap(), 1);

        let second = SessionStorage::new(temp_dir.path().join("s2"));
        assert_eq!(counter.record_visit(&second).await.unwrap(), 2);
    }
}
