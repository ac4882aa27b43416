use axum::{extract::State, Json};

use crate::{
    models::content::{NewsItem, SocialPost},
    AppState,
};

/// Handler for GET /api/news
/// Always 200; an empty list means every news source was unavailable
pub async fn get_news(State(state): State<AppState>) -> Json<Vec<NewsItem>> {
    let items = state.feeds.get_news().await;
    Json(items.into_iter().map(NewsItem::from).collect())
}

/// Handler for GET /api/social
/// Always 200; an empty list means every social source was unavailable
pub async fn get_social_feed(State(state): State<AppState>) -> Json<Vec<SocialPost>> {
    let items = state.feeds.get_social_feed().await;
    Json(items.into_iter().map(SocialPost::from).collect())
}
