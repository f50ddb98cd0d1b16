use std::process::ExitCode;

use ndarray::Array1;
use posit8_dtype::{DType, HostArray, InMemoryRuntime, Posit8Registry, Posit8_2, RegistryConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn reprs(values: &[Posit8_2]) -> String {
    let items: Vec<String> = values.iter().map(Posit8_2::repr).collect();
    format!("[{}]", items.join(", "))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    config.validate()?;

    let mut runtime = InMemoryRuntime::new();
    let mut registry = Posit8Registry::new(config);
    let posit = registry.ensure_registered(&mut runtime)?;

    // float32 -> posit8_2 -> float32 -> posit8_2 -> float32
    let x = HostArray::from_elements(DType::Float32, &[0.33f32, 0.25, 0.025, 0.0025, 0.00025]);
    let y = runtime.cast(&x, posit)?;
    let z = runtime.cast(&y, DType::Float32)?;
    let w = runtime.cast(&z, posit)?;
    let back = runtime.cast(&w, DType::Float32)?;

    println!("float32   {:?}", x.to_elements::<f32>());
    println!("posit8_2  {}", reprs(&y.to_elements()));
    println!("float32   {:?}", z.to_elements::<f32>());
    println!("posit8_2  {}", reprs(&w.to_elements()));
    println!("float32   {:?}", back.to_elements::<f32>());

    let one = HostArray::from_elements(posit, &[Posit8_2::ONE]);
    let sum = runtime.call("add", &[&one, &HostArray::from_elements(DType::Float64, &[1.0f64])])?;
    println!("1 + 1.0 = {}", reprs(&sum[0].to_elements()));

    let zero = HostArray::from_elements(posit, &[Posit8_2::ZERO]);
    let mut quotient = vec![HostArray::zeros(posit, 1, 1)];
    if let Err(err) = runtime.call_into("divide", &[&one, &zero], &mut quotient) {
        println!("1 / 0 = {} ({err})", reprs(&quotient[0].to_elements()));
    }

    let sorted = runtime.sort(&HostArray::from_elements(
        posit,
        &[Posit8_2::from(2.5f32), Posit8_2::NAR, Posit8_2::NEG_ONE, Posit8_2::ZERO],
    ))?;
    println!("sorted    {}", reprs(&sorted.to_elements()));

    let values = Array1::from(y.to_elements::<Posit8_2>());
    info!(sum = %values.sum(), dot = %values.dot(&values), "ndarray reductions over posit8_2");

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "posit8_2 demo failed");
            ExitCode::FAILURE
        }
    }
}
