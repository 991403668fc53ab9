//! Scenario Demo
//!
//! Runs one full synthesize → apply → verify loop against the in-memory
//! backend and prints the outcome.
//!
//! Use `-s` to pick a seed
//! Use `-m` to generate a variation product
//! Use `--imei` / `--lot` to pick an inventory mode
//! Use `-f` to load a scenario fixture file instead of the built-in data

use std::{rc::Rc, time::Duration};

use anyhow::Result;
use clap::Parser;

use counterpart::{
    apply::{InMemoryApplier, ModelApplier, Platform},
    backend::{Branch, FeatureSet, InMemoryBackend, SellerBackend, VatOption},
    fixtures::ScenarioFixture,
    retry::RetryPolicy,
    scenario::Scenario,
    synthesis::SynthesisConfig,
    utils::DemoScenarioArgs,
    verify::{OracleOptions, verify},
};

/// Scenario Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoScenarioArgs::parse();

    let (scenario, backend) = if let Some(path) = args.fixture.as_deref() {
        let fixture = ScenarioFixture::from_path(path)?;

        (fixture.scenario(), fixture.backend())
    } else {
        let config = SynthesisConfig {
            has_model: args.has_model,
            manage_by_imei: args.imei,
            has_lot: args.lot,
            branch_stock: vec![5, 0, 3],
            ..SynthesisConfig::default()
        };

        (Scenario::new(args.seed, config), default_backend())
    };

    let backend = Rc::new(backend);
    let expected = scenario.synthesize(&*backend)?;

    println!("synthesized '{}' with {} variant(s)", expected.name, expected.variants.len());

    let mut applier = InMemoryApplier::new(Rc::clone(&backend), Platform::Web);
    let product_id = applier.apply(&expected)?;

    // The in-memory backend settles instantly; the wait mirrors how a real
    // scenario pauses for background jobs before asserting.
    RetryPolicy::new(5, Duration::from_millis(10)).wait_until(
        "product never became fetchable",
        || backend.product_detail(product_id).is_ok(),
    )?;

    let mismatches = verify(&*backend, product_id, &expected, &OracleOptions::default())?;

    if mismatches.is_empty() {
        println!("product {product_id} verified clean");
    } else {
        for mismatch in &mismatches {
            println!("MISMATCH: {mismatch}");
        }
    }

    Ok(())
}

fn default_backend() -> InMemoryBackend {
    InMemoryBackend::new(
        vec![
            Branch {
                id: 1,
                name: "Head office".to_string(),
                active: true,
            },
            Branch {
                id: 2,
                name: "Warehouse".to_string(),
                active: true,
            },
            Branch {
                id: 3,
                name: "Closed outlet".to_string(),
                active: false,
            },
        ],
        "en",
        vec![VatOption {
            id: 10,
            name: "VAT 10".to_string(),
        }],
        FeatureSet::all(),
    )
}
