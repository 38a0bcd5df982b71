//! Balanced iteration over a skewed dataset, with a learning-rate schedule
//! and a mid-run checkpoint.
//!
//! Run with `RUST_LOG=info` to see the label table and schedule updates.

use balancer_data::{
    BalancedIteratorConfig, BalancedSerialIterator, CosineAnnealing, DataError, Serializable,
    StateDict, TupleDataset,
};

fn main() -> Result<(), DataError> {
    env_logger::init();

    // 95 negatives, 5 positives
    let features: Vec<i32> = (0..100).collect();
    let labels: Vec<i32> = (0..100).map(|i| if i < 95 { 0 } else { 1 }).collect();
    let dataset = TupleDataset::new(vec![features, labels])?;

    let config = BalancedIteratorConfig::new(10).with_seed(2024);
    let mut iterator = BalancedSerialIterator::from_label_feature(dataset, 1, config)?;
    iterator.sampler().log_label_stats();

    let mut schedule = CosineAnnealing::new(vec![0.0, 1.0, 3.0], 0.1, 0.001)?;
    let mut lr = 0.1;
    let mut checkpoint = None;

    while iterator.epoch() < 3 {
        let batch = iterator.next_batch()?;
        let positives = batch.iter().filter(|row| row[1] == 1).count();
        schedule.step(&iterator, &mut lr);
        println!(
            "epoch {:.2}: {} positives in batch, lr = {:.4}",
            iterator.epoch_detail(),
            positives,
            lr
        );
        if iterator.is_new_epoch() && iterator.epoch() == 1 {
            checkpoint = Some(iterator.state_dict()?.to_json_string()?);
        }
    }

    if let Some(json) = checkpoint {
        iterator.load_state_dict(&StateDict::from_json_str(&json)?)?;
        println!("restored checkpoint at epoch {:.2}", iterator.epoch_detail());
    }
    Ok(())
}
