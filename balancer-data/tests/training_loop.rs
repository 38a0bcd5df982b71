use approx::assert_relative_eq;
use balancer_data::{
    BalancedIteratorConfig, BalancedSerialIterator, CosineAnnealing, Dataset, ScheduleValue,
    Serializable, StateDict, TupleDataset,
};

/// 40 samples: label 0 for the first 30, label 1 for 8, label 2 for 2.
fn skewed_dataset() -> TupleDataset<i64> {
    let features: Vec<i64> = (0..40).collect();
    let labels: Vec<i64> = (0..40)
        .map(|i| match i {
            0..=29 => 0,
            30..=37 => 1,
            _ => 2,
        })
        .collect();
    TupleDataset::new(vec![features, labels]).unwrap()
}

fn iterator(seed: u64) -> BalancedSerialIterator<TupleDataset<i64>, i64> {
    let config = BalancedIteratorConfig::new(9).with_seed(seed);
    BalancedSerialIterator::from_label_feature(skewed_dataset(), 1, config).unwrap()
}

#[test]
fn test_epochs_are_balanced_across_labels() {
    let mut it = iterator(17);
    assert_eq!(it.sampler().epoch_size(), 90);
    assert_eq!(it.dataset().len(), 40);

    // 10 batches of 9 make exactly one epoch.
    let rows: Vec<Vec<i64>> = (0..10).flat_map(|_| it.next_batch().unwrap()).collect();
    assert!(it.is_new_epoch());
    for label in 0..3 {
        assert_eq!(rows.iter().filter(|row| row[1] == label).count(), 30);
    }
}

#[test]
fn test_schedules_follow_iterator_progress() {
    let mut it = iterator(5);
    let step_schedule = ScheduleValue::new(vec![1.0, 2.0], vec![0.01, 0.001]).unwrap();
    let mut cosine = CosineAnnealing::without_restart(3.0, 0.1, 0.0).unwrap();
    let mut lr = 0.1;
    let mut momentum = 0.9;
    let mut fired_at = Vec::new();

    // 30 batches of 9 over epochs of 90 -> exactly 3 epochs.
    for _ in 0..30 {
        it.next_batch().unwrap();
        if step_schedule.apply(&it, &mut lr).is_some() {
            fired_at.push(it.epoch_detail());
        }
        cosine.step(&it, &mut momentum);
    }
    assert_eq!(fired_at.len(), 2);
    assert_relative_eq!(fired_at[0], 1.0);
    assert_relative_eq!(fired_at[1], 2.0);
    assert_relative_eq!(lr, 0.001);
    assert_relative_eq!(it.epoch_detail(), 3.0);
    assert_relative_eq!(momentum, 0.0, epsilon = 1e-12);
}

#[test]
fn test_resume_from_json_snapshot() {
    let mut uninterrupted = iterator(99);
    let mut interrupted = iterator(99);
    for _ in 0..13 {
        assert_eq!(uninterrupted.next_batch().unwrap(), interrupted.next_batch().unwrap());
    }

    let snapshot = interrupted.state_dict().unwrap().to_json_string().unwrap();
    drop(interrupted);

    let mut resumed = iterator(12345);
    resumed
        .load_state_dict(&StateDict::from_json_str(&snapshot).unwrap())
        .unwrap();
    assert_relative_eq!(resumed.epoch_detail(), uninterrupted.epoch_detail());
    for _ in 0..25 {
        assert_eq!(resumed.next_batch().unwrap(), uninterrupted.next_batch().unwrap());
        assert_eq!(resumed.epoch(), uninterrupted.epoch());
    }
}
