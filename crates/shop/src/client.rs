//! A simulated shop client: browse cheap products, read discounts, review a
//! product and print a report.

use std::fmt::Write as _;
use std::thread;

use rust_decimal::Decimal;

use prodcat_catalog::query;
use prodcat_core::ProductId;
use prodcat_infra::CatalogRuntime;
use prodcat_products::Rating;

use crate::demo::REVIEWED_PRODUCTS;

/// What one client does, decided up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPlan {
    pub client: String,
    pub product: ProductId,
    pub locale: String,
}

/// Plans for `count` clients, alternating the reviewed product and rotating
/// through the first three `locales`.
pub fn plan_clients(count: usize, locales: &[String]) -> Vec<ClientPlan> {
    let rotation = &locales[..locales.len().min(3)];
    (0..count)
        .map(|n| ClientPlan {
            client: format!("Client {}", n + 1),
            product: ProductId::new(REVIEWED_PRODUCTS[n % REVIEWED_PRODUCTS.len()]),
            locale: rotation
                .get(n % rotation.len().max(1))
                .cloned()
                .unwrap_or_default(),
        })
        .collect()
}

/// Run one client session against the shared runtime and return its log.
///
/// Failures are written to the log and traced; they never abort the session.
pub fn run_client(runtime: &CatalogRuntime, plan: &ClientPlan) -> String {
    let thread_name = thread::current().name().unwrap_or("unnamed").to_string();
    let formatter = runtime.formatters.get(&plan.locale);
    let mut log = String::new();

    let _ = writeln!(log, "{} {thread_name}\n-\tstart of log\t-", plan.client);

    let budget = Decimal::new(200, 2);
    match runtime.product_listing(&plan.locale, query::price_below(budget), query::rating_desc_then_price_desc) {
        Ok(listing) => log.push_str(&listing),
        Err(e) => {
            tracing::error!(client = %plan.client, error = %e, "product listing failed");
            let _ = writeln!(log, "listing unavailable: {e}");
        }
    }

    match runtime.catalog.aggregate_discount_by_rating() {
        Ok(totals) => {
            for line in formatter.format_discounts(&totals) {
                let _ = writeln!(log, "{line}");
            }
        }
        Err(e) => {
            tracing::error!(client = %plan.client, error = %e, "discount summary failed");
            let _ = writeln!(log, "discounts unavailable: {e}");
        }
    }

    match runtime
        .catalog
        .apply_review(plan.product, Rating::FourStar, "Yet another review")
    {
        Ok(_) => {
            let _ = writeln!(log, "Product {} reviewed", plan.product);
        }
        Err(e) if e.is_expected() => {
            tracing::warn!(client = %plan.client, product_id = %plan.product, error = %e, "review rejected");
            let _ = writeln!(log, "Product {} not reviewed", plan.product);
        }
        Err(e) => {
            tracing::error!(client = %plan.client, product_id = %plan.product, error = %e, "review failed");
            let _ = writeln!(log, "Product {} not reviewed", plan.product);
        }
    }

    match runtime.write_report(plan.product, formatter.locale(), &plan.client) {
        Ok(path) => {
            let _ = writeln!(
                log,
                "{} generated report for {} product at {}",
                plan.client,
                plan.product,
                path.display()
            );
        }
        Err(e) => {
            tracing::warn!(client = %plan.client, product_id = %plan.product, error = %e, "report failed");
            let _ = writeln!(log, "{} could not report on {} product", plan.client, plan.product);
        }
    }

    let _ = write!(log, "-\tend of log\t-");
    log
}
