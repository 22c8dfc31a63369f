//! MNIST digit classification demo.
//!
//! Expects the IDX files `t10k-images.idx3-ubyte` and
//! `t10k-labels.idx1-ubyte` in a data directory (default `data/`, or pass
//! a directory as the first argument). Trains on the first 9000 samples
//! and reports accuracy on the rest.
//!
//! Run with:
//!   cargo run --example mnist --release -- [data_dir]

use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use cinder_nn::data::load_idx_pair;
use cinder_nn::{ActivationFunction, Layer, Model, TrainConfig};

const TRAIN_SPLIT: usize = 9000;

fn main() {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".into());

    let set = match load_idx_pair(
        format!("{data_dir}/t10k-images.idx3-ubyte"),
        format!("{data_dir}/t10k-labels.idx1-ubyte"),
        10,
    ) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("failed to load MNIST data: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "loaded {} images of {}x{} pixels",
        set.inputs.len(),
        set.rows,
        set.cols
    );

    let mut rng = StdRng::seed_from_u64(0xC1DE);
    let mut model = Model::new(
        vec![
            Layer::input(set.rows * set.cols),
            Layer::dense(128, ActivationFunction::ReLU),
            Layer::dense(128, ActivationFunction::ReLU),
            Layer::dense(128, ActivationFunction::ReLU),
            Layer::dense(10, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng,
    )
    .expect("model construction failed");

    let split = TRAIN_SPLIT.min(set.inputs.len());
    let (train_x, test_x) = set.inputs.split_at(split);
    let (train_y, test_y) = set.targets.split_at(split);

    // Print loss snapshots from a separate thread while training runs.
    let (tx, rx) = mpsc::channel::<cinder_nn::StepStats>();
    let printer = std::thread::spawn(move || {
        for stats in rx {
            println!(
                "step {}/{}: loss = {:.6}",
                stats.step, stats.total_steps, stats.loss
            );
        }
    });

    let mut config = TrainConfig::new(50_000, 0.001);
    config.report_every = 1000;
    config.progress_tx = Some(tx);

    let report = model
        .train(train_x, train_y, &config, &mut rng)
        .expect("training failed");
    drop(config);
    let _ = printer.join();

    if let Some(step) = report.diverged_at {
        eprintln!("training diverged at step {step}");
    }
    println!("training done ({} steps)... evaluating", report.completed_steps);

    let mut correct = 0;
    for (input, target) in test_x.iter().zip(test_y.iter()) {
        let output = model.evaluate(input).expect("evaluate failed");
        if argmax(&output) == argmax(target) {
            correct += 1;
        }
    }
    let accuracy = correct as f32 / test_x.len() as f32 * 100.0;
    println!("test accuracy: {accuracy:.2}% ({correct}/{})", test_x.len());
}

fn argmax(v: &[f32]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
