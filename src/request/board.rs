use crate::{
    foundation::error::BoardResult,
    render::{encode::data_uri, pipeline::Compositor},
    request::model::{BoardRequest, BoardResponse, FailureReport},
};

/// Run one client request end to end: composite, encode, report failures.
///
/// Request-level problems (bad window, canvas or track spec) are returned as errors; per-track
/// problems end up in [`BoardResponse::failures`] next to the partial image.
#[tracing::instrument(skip_all, fields(from = req.loc.from, to = req.loc.to))]
pub fn render_board(compositor: &Compositor, req: &BoardRequest) -> BoardResult<BoardResponse> {
    let out = compositor.composite(&req.to_composite())?;
    Ok(BoardResponse {
        image: data_uri(&out.canvas)?,
        failures: out.failures.iter().map(FailureReport::from).collect(),
    })
}
