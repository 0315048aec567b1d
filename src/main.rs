use std::env;

use anyhow::Context;
use log::info;
use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::Uniform;

use two_layer_net::{NetConfig, TwoLayerNet, arch::labels::one_hot};

const DEFAULT_BATCH_SIZE: usize = 100;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = NetConfig::from_env().context("loading network config")?;
    let batch_size = match env::var("BATCH_SIZE") {
        Ok(raw) => raw
            .parse::<usize>()
            .context("BATCH_SIZE must be a non-negative integer")?,
        Err(_) => DEFAULT_BATCH_SIZE,
    };
    let mut rng = match env::var("SEED") {
        Ok(raw) => {
            let seed = raw.parse().context("SEED must be an unsigned integer")?;
            StdRng::seed_from_u64(seed)
        }
        Err(_) => StdRng::from_os_rng(),
    };

    let (input, output) = (config.input_size(), config.output_size());
    let net = TwoLayerNet::new(config, &mut rng)?;
    info!("built network with {} parameters", net.params().size());

    let x = Array2::random_using((batch_size, input), Uniform::new(0., 1.)?, &mut rng);
    let y = net.predict(x.view())?;
    let (lo, hi) = y
        .rows()
        .into_iter()
        .map(|row| row.sum())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
    info!("prediction shape {:?}, row sums in [{lo}, {hi}]", y.dim());

    let x = Array2::random_using((batch_size, input), Uniform::new(0., 1.)?, &mut rng);
    let labels: Vec<usize> = (0..batch_size).map(|_| rng.random_range(0..output)).collect();
    let t = one_hot(&labels, output)?;
    info!(
        "loss {:.6}, {} of {batch_size} correct",
        net.loss(x.view(), t.view())?,
        net.accuracy(x.view(), t.view())?
    );

    let grads = net.par_numerical_gradient(x.view(), t.view())?;

    println!("grads finished");
    let params = net.params();
    println!(
        "params: w1 {:?}, b1 {:?}, w2 {:?}, b2 {:?}",
        params.w1().dim(),
        params.b1().dim(),
        params.w2().dim(),
        params.b2().dim()
    );
    println!(
        "grads:  w1 {:?}, b1 {:?}, w2 {:?}, b2 {:?}",
        grads.w1().dim(),
        grads.b1().dim(),
        grads.w2().dim(),
        grads.b2().dim()
    );

    let analytic = net.gradient(x.view(), t.view())?;
    println!(
        "max |numerical - backprop| = {:e}",
        grads.max_abs_diff(&analytic)
    );

    Ok(())
}
