use kamo::{ConfigError, EventStream, StreamConfig, StreamSettings, MAX_SUBSCRIBER_CAPACITY};

#[test]
fn test_default_settings() {
    let settings = StreamSettings::default();
    assert_eq!(settings.label, None);
    assert_eq!(settings.subscriber_capacity, 4);
    assert!(!settings.metrics_enabled);
}

#[test]
fn test_settings_from_json_fills_defaults() {
    let settings = StreamSettings::from_json(r#"{"label": "keyup", "metrics_enabled": true}"#)
        .expect("valid settings");
    assert_eq!(settings.label.as_deref(), Some("keyup"));
    assert_eq!(settings.subscriber_capacity, 4);
    assert!(settings.metrics_enabled);

    let stream: EventStream<u32> = EventStream::with_config(StreamConfig::from_settings(settings));
    stream.publish(1);
    assert_eq!(stream.label().as_deref(), Some("keyup"));
    assert_eq!(stream.metrics().map(|m| m.values_published), Some(1));
}

#[test]
fn test_settings_rejects_blank_label() {
    let err = StreamSettings::from_json(r#"{"label": "   "}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert_eq!(err.to_string(), "Validation error: label must not be blank");
}

#[test]
fn test_settings_rejects_malformed_json() {
    let err = StreamSettings::from_json(r#"{"subscriber_capacity": "many"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Serialization(_)));
}

#[test]
fn test_settings_rejects_oversized_subscriber_capacity() {
    let err = StreamSettings::from_json(r#"{"subscriber_capacity": 18446744073709551615}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));

    let at_limit = format!(r#"{{"subscriber_capacity": {}}}"#, MAX_SUBSCRIBER_CAPACITY);
    assert!(StreamSettings::from_json(&at_limit).is_ok());
}

#[test]
fn test_oversized_capacity_from_builder_is_capped() {
    let stream: EventStream<u8> =
        EventStream::with_config(StreamConfig::new().subscriber_capacity(usize::MAX));
    stream.subscribe(|_| {});
    stream.publish(1);
    assert_eq!(stream.subscriber_count(), 1);
}

#[test]
fn test_config_builder() {
    let config: StreamConfig<i32> = StreamConfig::new()
        .label("scores")
        .subscriber_capacity(16)
        .metrics(true)
        .terminal(|v| *v == i32::MIN);

    assert_eq!(config.settings.label.as_deref(), Some("scores"));
    assert_eq!(config.settings.subscriber_capacity, 16);
    assert!(config.settings.metrics_enabled);
    assert!(config.terminal.is_some());

    let debug = format!("{:?}", config);
    assert!(debug.contains("Some(TerminalPredicate)"));

    let stream = EventStream::with_config(config.clone());
    stream.publish(1).publish(i32::MIN);
    assert!(stream.is_closed());
}
