use super::*;

#[test]
fn test_new_defaults() {
    let config: BalancedIteratorConfig<u8> = BalancedIteratorConfig::new(8);
    assert_eq!(config.batch_size, 8);
    assert!(config.shuffle);
    assert!(config.repeat);
    assert!(config.ignore_labels.is_empty());
    assert_eq!(config.seed, None);
}

#[test]
fn test_builder_methods() {
    let config = BalancedIteratorConfig::new(4)
        .with_shuffle(false)
        .with_repeat(false)
        .with_ignore_labels(vec![2, 3])
        .with_seed(7);
    assert!(!config.shuffle);
    assert!(!config.repeat);
    assert_eq!(config.ignore_labels, vec![2, 3]);
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_validate_rejects_zero_batch_size() {
    let config: BalancedIteratorConfig<i32> = BalancedIteratorConfig::new(0);
    assert!(matches!(config.validate(), Err(DataError::ConfigurationError(_))));
}

#[test]
fn test_json_defaults_are_filled_in() {
    let config: BalancedIteratorConfig<String> =
        BalancedIteratorConfig::from_json_str(r#"{"batch_size": 32}"#).unwrap();
    assert_eq!(config, BalancedIteratorConfig::new(32));
}

#[test]
fn test_json_round_trip_keeps_every_field() {
    let config = BalancedIteratorConfig::new(5)
        .with_shuffle(false)
        .with_ignore_labels(vec!["cat".to_string()])
        .with_seed(11);
    let json = config.to_json_string().unwrap();
    assert_eq!(BalancedIteratorConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_json_errors() {
    let missing = BalancedIteratorConfig::<i32>::from_json_str(r#"{"shuffle": false}"#);
    assert!(matches!(missing, Err(DataError::ConfigurationError(_))));

    let zero = BalancedIteratorConfig::<i32>::from_json_str(r#"{"batch_size": 0}"#);
    assert!(matches!(zero, Err(DataError::ConfigurationError(_))));

    let malformed = BalancedIteratorConfig::<i32>::from_json_str(r#"{"batch_size": 4, "ignore_labels": "x"}"#);
    assert!(matches!(malformed, Err(DataError::ConfigurationError(_))));
}
