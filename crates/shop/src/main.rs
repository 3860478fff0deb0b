use std::sync::Arc;

use anyhow::Context;

use prodcat_catalog::query;
use prodcat_core::SystemClock;
use prodcat_infra::CatalogConfig;
use prodcat_products::Rating;
use prodcat_shop::{JobOutcome, PoolConfig, WorkerPool, demo, plan_clients, run_client};

const CLIENTS: usize = 5;

fn main() -> anyhow::Result<()> {
    prodcat_observability::init();

    let config = CatalogConfig::from_env().context("loading catalog configuration")?;
    let runtime = prodcat_infra::bootstrap(config, Arc::new(SystemClock)).context("bootstrapping catalog")?;

    if runtime.catalog.is_empty()? {
        tracing::warn!(
            folder = %runtime.config.data_folder.display(),
            "no products found; seeding demo catalog"
        );
        demo::seed(&runtime.catalog)?;
        let seeded = runtime.catalog.snapshot()?;
        prodcat_infra::write_directory(&runtime.config, &seeded.entries).context("writing demo data folder")?;
    }

    let plans = plan_clients(CLIENTS, &runtime.formatters.supported_locales());
    let pool = WorkerPool::new(PoolConfig::default())?;
    let jobs: Vec<_> = plans
        .iter()
        .map(|plan| {
            let runtime = &runtime;
            move || run_client(runtime, plan)
        })
        .collect();

    for (plan, outcome) in plans.iter().zip(pool.invoke_all(jobs)?) {
        match outcome {
            JobOutcome::Completed(log) => println!("{log}"),
            JobOutcome::Panicked(message) => {
                tracing::error!(client = %plan.client, panic = %message, "client session failed");
            }
        }
    }

    let top_rated = runtime.product_listing(
        runtime.formatters.default_locale(),
        query::rated_at_least(Rating::FourStar),
        query::rating_desc_then_price_desc,
    )?;
    println!("Top rated:\n{top_rated}");

    let snapshot = prodcat_infra::shutdown(&runtime).context("dumping catalog snapshot")?;
    tracing::info!(file = %snapshot.display(), "shop closed");
    Ok(())
}
