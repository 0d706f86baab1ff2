use iphone_gps::{
    gps::data::parse_updated, Coordinates, DisplayHardware, IphoneGps, PluginOptions, StatusView, WebhookRequest,
    WebhookResponse,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn push(plugin: &IphoneGps, lat: &str, lon: &str, alt: &str) -> WebhookResponse {
    plugin.on_webhook(
        &WebhookRequest::get("send_gps")
            .with_param("lat", lat)
            .with_param("lon", lon)
            .with_param("alt", alt),
    )
}

fn started(options: PluginOptions) -> (IphoneGps, Mutex<StatusView>) {
    let plugin = IphoneGps::new(options.clone());
    let ui = Mutex::new(StatusView::new(DisplayHardware::WaveshareV2));
    plugin.on_loaded();
    plugin.on_config_changed(options);
    plugin.on_ui_setup(&ui);
    plugin.on_ready();
    (plugin, ui)
}

#[test]
fn push_get_and_save_round() {
    let dir = tempfile::tempdir().unwrap();
    let (plugin, ui) = started(PluginOptions::default());

    assert_eq!(push(&plugin, "37.1234", "-122.4567", "15,0"), WebhookResponse::Empty);

    let WebhookResponse::Json(body) = plugin.on_webhook(&WebhookRequest::get("get_gps")) else {
        panic!("expected JSON");
    };
    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["Accuracy", "Altitude", "Latitude", "Longitude", "Updated"]);
    assert!(parse_updated(body["Updated"].as_str().unwrap()).is_some());

    let capture = dir.path().join("Office_0a1b2c3d4e5f.pcap");
    let saved = plugin.on_handshake(&capture, "Office", "0a1b2c3d4e5f").unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(on_disk, body);

    plugin.on_ui_update(&ui);
    assert_eq!(ui.lock().unwrap().value("longitude"), Some("122.4567W "));

    plugin.on_unload(&ui);
    assert!(ui.lock().unwrap().is_empty());
}

#[test]
fn stop_then_get_returns_empty_object() {
    let (plugin, _ui) = started(PluginOptions::default());
    push(&plugin, "48.117", "11.517", "545.4");

    plugin.on_webhook(&WebhookRequest::from_target(iphone_gps::Method::Get, "stop"));

    assert_eq!(plugin.on_webhook(&WebhookRequest::get("get_gps")), WebhookResponse::Json(json!({})));
    assert_eq!(push(&plugin, "48.2", "11.6", "540"), WebhookResponse::Text("stop".to_string()));
}

#[test]
fn stale_location_saved_after_stop_with_use_last_loc() {
    let dir = tempfile::tempdir().unwrap();
    let (plugin, _ui) = started(PluginOptions {
        use_last_loc: true,
        ..PluginOptions::default()
    });
    push(&plugin, "48.117", "11.517", "545.4");
    plugin.on_webhook(&WebhookRequest::get("stop"));

    let saved = plugin.on_handshake(&dir.path().join("late.pcap"), "late", "").unwrap();
    let coords = Coordinates::load_from(&saved).unwrap();
    assert_eq!((coords.latitude, coords.longitude, coords.altitude), (48.117, 11.517, 545.4));
}

#[test]
fn hooks_are_shareable_across_threads() {
    let (plugin, ui) = started(PluginOptions::default());
    let plugin = Arc::new(plugin);
    let ui = Arc::new(ui);

    let writer = {
        let plugin = Arc::clone(&plugin);
        std::thread::spawn(move || {
            for i in 1..=50 {
                push(&plugin, &format!("{}.5", i), "11.5", "100");
            }
        })
    };
    let reader = {
        let plugin = Arc::clone(&plugin);
        let ui = Arc::clone(&ui);
        std::thread::spawn(move || {
            for _ in 0..50 {
                plugin.on_ui_update(&ui);
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    plugin.on_ui_update(&ui);
    assert_eq!(ui.lock().unwrap().value("latitude"), Some("50.5000N "));
}
