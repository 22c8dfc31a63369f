use rand::rngs::StdRng;
use rand::SeedableRng;

use cinder_nn::{ActivationFunction, Layer, Model, TrainConfig};

fn main() {
    let mut rng = StdRng::seed_from_u64(42);

    let mut model = Model::new(
        vec![
            Layer::input(2),
            Layer::dense(8, ActivationFunction::ReLU),
            Layer::dense(2, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng,
    )
    .expect("model construction failed");

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    // One-hot targets: class 1 = "inputs differ".
    let targets = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];

    let config = TrainConfig::new(20_000, 0.05);
    let report = model
        .train(&inputs, &targets, &config, &mut rng)
        .expect("training failed");

    println!(
        "trained {} steps, final loss {:.6}",
        report.completed_steps, report.last_loss
    );
    if let Some(step) = report.diverged_at {
        println!("training diverged at step {step}");
    }

    for input in &inputs {
        let output = model.evaluate(input).expect("evaluate failed");
        println!(
            "{:?} -> [{:.3}, {:.3}]  (class {})",
            input,
            output[0],
            output[1],
            if output[1] > output[0] { 1 } else { 0 }
        );
    }
}
