//! Page content and visit counter commands

use crate::app::AppState;
use crate::database::{AchievementsData, HeroContent, Lang, ResumeData};
use crate::error::Result;

/// Resume text in the requested language
pub async fn get_resume_text(state: &AppState, lang: Lang) -> Result<String> {
    let resume = state.content.get_resume().await?;
    Ok(resume.content_for(lang).to_string())
}

pub async fn get_resume(state: &AppState) -> Result<ResumeData> {
    state.content.get_resume().await
}

pub async fn save_resume(
    state: &AppState,
    content: String,
    content_en: String,
) -> Result<ResumeData> {
    state.session.require_admin()?;
    state.content.update_resume(content, content_en).await
}

pub async fn get_achievements_text(state: &AppState, lang: Lang) -> Result<String> {
    let achievements = state.content.get_achievements().await?;
    Ok(achievements.content_for(lang).to_string())
}

pub async fn get_achievements(state: &AppState) -> Result<AchievementsData> {
    state.content.get_achievements().await
}

pub async fn save_achievements(
    state: &AppState,
    content: String,
    content_en: String,
) -> Result<AchievementsData> {
    state.session.require_admin()?;
    state.content.update_achievements(content, content_en).await
}

pub async fn get_hero(state: &AppState) -> Result<HeroContent> {
    state.content.get_hero().await
}

pub async fn save_hero(state: &AppState, hero: HeroContent) -> Result<HeroContent> {
    state.session.require_admin()?;
    state.content.update_hero(hero).await
}

/// Count a page view for the current session
pub async fn record_visit(state: &AppState) -> Result<u64> {
    state.visits.record_visit(state.session.storage()).await
}
