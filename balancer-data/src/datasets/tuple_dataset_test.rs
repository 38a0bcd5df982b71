use super::*;
use crate::error::DataError;

#[test]
fn test_tuple_dataset_new_empty() {
    let dataset: TupleDataset<f32> = TupleDataset::new(vec![]).unwrap();
    assert_eq!(dataset.len(), 0);
    assert!(dataset.is_empty());
    assert_eq!(dataset.num_columns(), 0);
}

#[test]
fn test_tuple_dataset_new_multiple_columns_valid() {
    let dataset = TupleDataset::new(vec![vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0]]).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.num_columns(), 2);
}

#[test]
fn test_tuple_dataset_new_length_mismatch() {
    let err = TupleDataset::new(vec![vec![1, 2], vec![1, 2, 3]]).err().unwrap();
    match err {
        DataError::ConfigurationError(message) => assert!(message.contains("column 1")),
        _ => panic!("Expected ConfigurationError"),
    }
}

#[test]
fn test_tuple_dataset_get_row() {
    let dataset = TupleDataset::new(vec![vec![1, 2, 3], vec![10, 20, 30]]).unwrap();
    assert_eq!(dataset.get(1).unwrap(), vec![2, 20]);
}

#[test]
fn test_tuple_dataset_get_invalid_index() {
    let dataset = TupleDataset::new(vec![vec![1, 2]]).unwrap();
    assert_eq!(
        dataset.get(2),
        Err(DataError::IndexOutOfBounds { index: 2, len: 2 })
    );
}

#[test]
fn test_tuple_dataset_extract_feature() {
    let dataset = TupleDataset::new(vec![vec![1, 2, 3], vec![0, 1, 4]]).unwrap();
    assert_eq!(dataset.features_length(), 2);
    assert_eq!(dataset.extract_feature(2, 1).unwrap(), 4);
    assert!(dataset.extract_feature(0, 2).is_err());
    assert!(dataset.extract_feature(3, 0).is_err());
    assert_eq!(dataset.extract_feature_range(0..2, 1), Some(vec![0, 1]));
}
