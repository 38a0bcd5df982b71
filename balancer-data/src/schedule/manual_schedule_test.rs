use super::*;
use approx::assert_relative_eq;

/// Progress fixed at construction: `(previous, current)`.
struct Progress(Option<f64>, f64);

impl EpochProgress for Progress {
    fn epoch_detail(&self) -> f64 {
        self.1
    }

    fn previous_epoch_detail(&self) -> Option<f64> {
        self.0
    }
}

#[test]
fn test_trigger_rejects_non_finite_points() {
    assert!(ManualScheduleTrigger::new(vec![1.0, f64::NAN]).is_err());
    assert!(ManualScheduleTrigger::new(vec![f64::INFINITY]).is_err());
}

#[test]
fn test_trigger_crossing_is_half_open() {
    let trigger = ManualScheduleTrigger::new(vec![1.0, 2.0, 3.5]).unwrap();
    assert_eq!(trigger.crossed(&Progress(Some(0.9), 1.0)), vec![0]);
    assert!(!trigger.check(&Progress(Some(1.0), 1.4)));
    assert_eq!(trigger.crossed(&Progress(Some(1.5), 3.6)), vec![1, 2]);
}

#[test]
fn test_trigger_without_previous_progress() {
    let trigger = ManualScheduleTrigger::new(vec![0.0, 0.5]).unwrap();
    assert_eq!(trigger.crossed(&Progress(None, 0.0)), vec![0]);
}

#[test]
fn test_schedule_value_length_mismatch() {
    let err = ScheduleValue::new(vec![1.0, 2.0], vec![0.1]).err().unwrap();
    assert!(matches!(err, DataError::ConfigurationError(_)));
}

#[test]
fn test_schedule_value_applies_latest_crossed_value() {
    let schedule = ScheduleValue::new(vec![2.0, 4.0, 7.0], vec![0.008, 0.006, 0.002]).unwrap();
    let mut lr = 0.01;
    assert_eq!(schedule.apply(&Progress(Some(0.5), 1.0), &mut lr), None);
    assert_relative_eq!(lr, 0.01);

    assert_eq!(schedule.apply(&Progress(Some(1.9), 2.0), &mut lr), Some(0.008));
    assert_relative_eq!(lr, 0.008);

    // A single large step crosses two points; the later one wins.
    assert_eq!(schedule.apply(&Progress(Some(3.0), 7.5), &mut lr), Some(0.002));
    assert_relative_eq!(lr, 0.002);
}

#[test]
fn test_schedule_value_single() {
    let schedule = ScheduleValue::single(3.0, 0.5).unwrap();
    assert_eq!(schedule.trigger().points(), &[3.0]);
    let mut value = 1.0;
    schedule.apply(&Progress(Some(2.99), 3.01), &mut value);
    assert_relative_eq!(value, 0.5);
}
