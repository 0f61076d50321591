use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    catalog,
    channel::Channel,
    proxy::HeaderCodec,
    server::{params::ChannelParams, state::AppState},
    Result,
};

/// A merged channel plus its relay link.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelView<'a> {
    #[serde(flatten)]
    pub channel: &'a Channel,
    pub stream_url: String,
}

impl<'a> ChannelView<'a> {
    pub fn new(channel: &'a Channel) -> Result<Self> {
        Ok(Self {
            channel,
            stream_url: HeaderCodec::stream_link(channel)?,
        })
    }
}

#[derive(Serialize)]
pub struct GroupView {
    pub title: String,
    pub count: usize,
}

/// Handle GET /channels requests.
pub async fn handle_channels(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
) -> Result<Response> {
    let library = state.library.read().await;

    let mut channels = catalog::search(library.channels(), params.q.as_deref().unwrap_or(""));
    if let Some(group) = params.group.as_deref().filter(|g| !g.is_empty()) {
        channels.retain(|channel| channel.group_title() == group);
    }

    tracing::debug!("Channel query matched {} channels", channels.len());

    let views = channels
        .into_iter()
        .map(ChannelView::new)
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(views).into_response())
}

/// Handle GET /groups requests.
pub async fn handle_groups(State(state): State<AppState>) -> Json<Vec<GroupView>> {
    let library = state.library.read().await;

    let groups = catalog::group_channels(library.channels())
        .into_iter()
        .map(|group| GroupView {
            count: group.len(),
            title: group.title,
        })
        .collect();

    Json(groups)
}
