//! cinder-nn · digit-drawing GUI
//!
//! Trains a digit classifier on an MNIST IDX pair, then serves a browser
//! page with a 28×28 canvas. Every brush stroke posts the raw pixel
//! buffer to `/evaluate`, which runs the model's forward pass and returns
//! the ten class probabilities. The server never trains after startup.
//!
//! Run with:
//!   cargo run --bin draw --release -- [data_dir]
//! Then open http://127.0.0.1:7878

use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server};

use cinder_nn::data::load_idx_pair;
use cinder_nn::{ActivationFunction, Layer, Model, TrainConfig};

// The page is embedded at compile time so the binary is self-contained.
const INDEX_HTML: &str = include_str!("index.html");

#[derive(Serialize)]
struct EvalResponse {
    scores: Vec<f32>,
    prediction: usize,
}

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
    let input_size = set.rows * set.cols;

    let mut rng = StdRng::seed_from_u64(0xC1DE);
    let mut model = Model::new(
        vec![
            Layer::input(input_size),
            Layer::dense(128, ActivationFunction::ReLU),
            Layer::dense(128, ActivationFunction::ReLU),
            Layer::dense(128, ActivationFunction::ReLU),
            Layer::dense(10, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng,
    )
    .expect("model construction failed");

    println!("training on {} samples...", set.inputs.len());
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
        .train(&set.inputs, &set.targets, &config, &mut rng)
        .expect("training failed");
    drop(config);
    let _ = printer.join();

    if let Some(step) = report.diverged_at {
        eprintln!("warning: training diverged at step {step}; serving the partial model");
    }

    let addr = "127.0.0.1:7878";
    let server = Server::http(addr).expect("failed to bind HTTP server");
    println!("cinder-nn draw: open http://{addr} in your browser");

    // The model's forward pass reuses per-layer caches, so requests are
    // handled strictly one at a time on this thread.
    for mut request in server.incoming_requests() {
        let response = match (request.method(), request.url()) {
            (&Method::Get, "/") => html_response(INDEX_HTML),
            (&Method::Post, "/evaluate") => {
                let mut body = String::new();
                if request.as_reader().read_to_string(&mut body).is_err() {
                    text_response(400, "unreadable request body")
                } else {
                    evaluate_response(&mut model, &body, input_size)
                }
            }
            _ => text_response(404, "not found"),
        };
        let _ = request.respond(response);
    }
}

fn evaluate_response(
    model: &mut Model,
    body: &str,
    input_size: usize,
) -> Response<std::io::Cursor<Vec<u8>>> {
    let pixels: Vec<f32> = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => return text_response(400, &format!("bad pixel payload: {e}")),
    };
    if pixels.len() != input_size {
        return text_response(
            400,
            &format!("expected {input_size} pixels, got {}", pixels.len()),
        );
    }
    match model.evaluate(&pixels) {
        Ok(scores) => {
            let prediction = scores
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let payload = serde_json::to_string(&EvalResponse { scores, prediction })
                .unwrap_or_else(|_| "{}".into());
            json_response(&payload)
        }
        Err(e) => text_response(500, &format!("evaluation failed: {e}")),
    }
}

fn html_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_header(header("text/html; charset=utf-8"))
}

fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_header(header("application/json"))
}

fn text_response(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(header("text/plain; charset=utf-8"))
}

fn header(content_type: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        .expect("static header is valid")
}
