//! Parallel Generation
//!
//! Runs the harmonic and intermodulation generators on Rayon, one task per
//! aggressor or ordered aggressor pair. Enable with the `parallel` feature.
//!
//! ```toml
//! [dependencies]
//! rfcoex-core = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! Per-task outputs are concatenated in the sequential emission order, so
//! dedup keeps the same first occurrence and the final report is identical
//! to [`crate::analysis::analyze`]. Worth it from roughly a dozen bands up;
//! below that the sequential path is faster.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::aclr::generate_aclr;
use crate::analysis::{AnalysisOptions, AnalysisReport};
use crate::band::Band;
use crate::harmonic::harmonics_of;
use crate::imd::{beat_products, mixing_products};
use crate::overlap::check_overlaps;
use crate::product::InterferenceProduct;
use crate::ranking;
use crate::scan::VictimScan;

fn flatten(chunks: Vec<Vec<InterferenceProduct>>) -> Vec<InterferenceProduct> {
    let total = chunks.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for chunk in chunks {
        out.extend(chunk);
    }
    out
}

/// Raw products, same content and order as
/// [`crate::analysis::generate_products`].
pub fn generate_products_parallel(bands: &[Band], options: &AnalysisOptions) -> Vec<InterferenceProduct> {
    let scan = VictimScan::new(bands, options.guard_mhz);

    let harmonics: Vec<Vec<InterferenceProduct>> = bands
        .par_iter()
        .map(|band| {
            let mut out = Vec::new();
            harmonics_of(band, &scan, &mut out);
            out
        })
        .collect();

    let unordered: Vec<(usize, usize)> = (0..bands.len())
        .flat_map(|i| (i + 1..bands.len()).map(move |j| (i, j)))
        .collect();
    let beats: Vec<Vec<InterferenceProduct>> = if options.imd2 {
        unordered
            .par_iter()
            .map(|&(i, j)| {
                let mut out = Vec::new();
                beat_products(&bands[i], &bands[j], &scan, &mut out);
                out
            })
            .collect()
    } else {
        Vec::new()
    };

    let ordered: Vec<(usize, usize)> = (0..bands.len())
        .flat_map(|i| (0..bands.len()).filter(move |&j| j != i).map(move |j| (i, j)))
        .collect();
    let mixing: Vec<Vec<InterferenceProduct>> = ordered
        .par_iter()
        .map(|&(i, j)| {
            let mut out = Vec::new();
            mixing_products(&bands[i], &bands[j], options, &scan, &mut out);
            out
        })
        .collect();

    let mut products = flatten(harmonics);
    products.extend(flatten(beats));
    products.extend(flatten(mixing));
    products.extend(generate_aclr(bands, options.aclr_margin_mhz));
    debug!(raw = products.len(), tasks = bands.len() + unordered.len() + ordered.len(), "parallel generation done");
    products
}

/// [`crate::analysis::analyze`] with parallel generation.
pub fn analyze_parallel(bands: &[Band], options: &AnalysisOptions) -> AnalysisReport {
    let mut alerts = check_overlaps(bands, options.guard_mhz);
    let raw = generate_products_parallel(bands, options);
    let products = ranking::finalize(raw, &mut alerts);
    info!(
        bands = bands.len(),
        products = products.len(),
        alerts = alerts.len(),
        "parallel analysis complete"
    );
    AnalysisReport { products, alerts }
}
