use super::*;
use approx::assert_relative_eq;
use std::sync::{Arc, Mutex};

struct Progress(f64);

impl EpochProgress for Progress {
    fn epoch_detail(&self) -> f64 {
        self.0
    }

    fn previous_epoch_detail(&self) -> Option<f64> {
        None
    }
}

#[test]
fn test_new_validates_epoch_list() {
    assert!(CosineAnnealing::new(vec![0.0], 0.1, 0.0).is_err());
    assert!(CosineAnnealing::new(vec![0.0, 2.0, 2.0], 0.1, 0.0).is_err());
    assert!(CosineAnnealing::new(vec![0.0, 4.0, 2.0], 0.1, 0.0).is_err());
    assert!(CosineAnnealing::new(vec![0.0, f64::NAN], 0.1, 0.0).is_err());
    assert!(CosineAnnealing::new(vec![0.0, 2.0, 4.0], 0.1, 0.0).is_ok());
}

#[test]
fn test_single_stage_curve() {
    let mut schedule = CosineAnnealing::without_restart(10.0, 0.1, 0.0).unwrap();
    let mut lr = 1.0;
    assert_relative_eq!(schedule.step(&Progress(0.0), &mut lr).unwrap(), 0.1);
    assert_relative_eq!(schedule.step(&Progress(5.0), &mut lr).unwrap(), 0.05, epsilon = 1e-12);
    assert_relative_eq!(lr, 0.05, epsilon = 1e-12);
    assert_relative_eq!(schedule.step(&Progress(10.0), &mut lr).unwrap(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_out_of_range_leaves_value_alone() {
    let mut schedule = CosineAnnealing::new(vec![1.0, 3.0], 0.1, 0.01).unwrap();
    let mut lr = 0.5;
    assert_eq!(schedule.step(&Progress(0.5), &mut lr), None);
    assert_eq!(schedule.step(&Progress(3.5), &mut lr), None);
    assert_relative_eq!(lr, 0.5);
}

#[test]
fn test_restart_resets_to_lr_max_and_calls_back() {
    let ended = Arc::new(Mutex::new(Vec::<usize>::new()));
    let sink = Arc::clone(&ended);
    let mut schedule = CosineAnnealing::new(vec![0.0, 2.0, 4.0, 8.0], 0.1, 0.0)
        .unwrap()
        .with_callback(Box::new(move |stage: usize| sink.lock().unwrap().push(stage)));
    let mut lr = 0.0;

    schedule.step(&Progress(1.9), &mut lr);
    assert_eq!(schedule.current_stage(), 0);
    assert!(lr < 0.01);

    assert_relative_eq!(schedule.step(&Progress(2.0), &mut lr).unwrap(), 0.1);
    assert_eq!(schedule.current_stage(), 1);

    // Jumping straight into the last stage reports the stage that ended.
    assert_relative_eq!(schedule.step(&Progress(6.0), &mut lr).unwrap(), 0.05, epsilon = 1e-12);
    assert_eq!(schedule.current_stage(), 2);

    assert_relative_eq!(schedule.step(&Progress(8.0), &mut lr).unwrap(), 0.0, epsilon = 1e-12);
    assert_eq!(schedule.current_stage(), 2);
    assert_eq!(*ended.lock().unwrap(), vec![0, 1]);
}
