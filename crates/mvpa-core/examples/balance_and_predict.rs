use anyhow::Result;
use ndarray::{array, Array1, Array2};

use mvpa_core::{balance_with_config, BalanceConfig, BalanceMethod, Dataset, LdaModel};

fn main() -> Result<()> {
    env_logger::init();

    // Imbalanced synthetic dataset: 8 samples of class 1 around (0, 0),
    // 3 samples of class 2 around (4, 4)
    let x = Array2::from_shape_vec(
        (11, 2),
        vec![
            0.1, 0.2, //
            -0.3, 0.1, //
            0.2, -0.1, //
            0.0, 0.4, //
            -0.2, -0.3, //
            0.3, 0.3, //
            -0.1, 0.0, //
            0.4, -0.2, //
            4.1, 3.9, //
            3.8, 4.2, //
            4.3, 4.0, //
        ],
    )?;
    let labels = Array1::from_vec(vec![1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2]);
    let dataset = Dataset::new(x, labels)?;
    dataset.log_class_summary();

    let method: BalanceMethod = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "undersample".to_string())
        .parse()?;
    let config = BalanceConfig::new(method).with_seed(42);
    let balanced = balance_with_config(&dataset, &config)?;
    balanced.dataset.log_class_summary();

    println!("Method: {}", method);
    println!("Balanced class counts: {:?}", balanced.class_counts());
    println!("Row origins: {:?}", balanced.labelidx);

    // Identity projection with one centroid per class
    let model = LdaModel::new(Array2::eye(2), array![[0.0, 0.0], [4.0, 4.0]], 2)?;
    let predicted = model.predict(&balanced.dataset.x)?;
    let correct = predicted
        .iter()
        .zip(balanced.dataset.labels.iter())
        .filter(|(p, t)| p == t)
        .count();

    println!(
        "Accuracy on balanced data: {}/{}",
        correct,
        balanced.dataset.nrows()
    );

    Ok(())
}
