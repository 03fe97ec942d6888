use super::*;
use crate::foundation::core::Rgb8;

#[test]
fn parses_original_request_shape() {
    let req = BoardRequest::from_json_str(
        r#"{
            "loc": {"from": 1000, "to": 2000},
            "Tracks": [
                {"name": "ENSG1", "height": 40, "v_offset": 0,
                 "fgColor": {"r": 0, "g": 0, "b": 0}, "bgColor": {"r": 255, "g": 255, "b": 255}}
            ],
            "conf": {"height": 100, "width": 1000, "bgColor": {"r": 250, "g": 250, "b": 250}}
        }"#,
    )
    .unwrap();
    assert_eq!(req.loc, GenomicWindow { from: 1000.0, to: 2000.0 });
    assert_eq!(req.tracks.len(), 1);
    assert_eq!(req.tracks[0].name, "ENSG1");
    assert_eq!(req.conf.width, 1000);
    assert_eq!(req.conf.bg_color, Rgb8::new(250, 250, 250));

    let c = req.to_composite();
    assert_eq!(c.window, req.loc);
    assert_eq!(c.tracks, req.tracks);
}

#[test]
fn lowercase_tracks_key_is_accepted() {
    let req = BoardRequest::from_json_str(
        r#"{"loc": {"from": 0, "to": 1}, "tracks": [], "conf": {"width": 1, "height": 1}}"#,
    )
    .unwrap();
    assert!(req.tracks.is_empty());
    assert_eq!(req.conf.bg_color, Rgb8::default());
}

#[test]
fn malformed_request_is_serde_error() {
    let err = BoardRequest::from_json_str(r#"{"loc": {"from": "a"}}"#).unwrap_err();
    assert_eq!(err.code(), "SERDE");
}

#[test]
fn failure_report_carries_code_and_message() {
    let f = TrackFailure {
        index: 2,
        track: "b".to_string(),
        error: BoardError::not_found("b"),
    };
    let r = FailureReport::from(&f);
    assert_eq!(r.index, 2);
    assert_eq!(r.code, "FETCH_NOT_FOUND");
    assert!(r.message.contains("'b'"));
    let json = serde_json::to_value(&BoardResponse {
        image: "data:image/png;base64,".to_string(),
        failures: vec![r],
    })
    .unwrap();
    assert_eq!(json["failures"][0]["track"], "b");
}
