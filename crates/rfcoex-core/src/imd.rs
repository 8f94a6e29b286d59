//! Intermodulation generator
//!
//! Two passes over the selection:
//!
//! - IM2 beat terms over unordered pairs `i < j`: `A + B`, `A - B` and the
//!   reverse subtraction `B - A`. Addition commutes, so only subtraction is
//!   emitted with swapped operands.
//! - Odd/high-order mixing over ordered pairs `i != j`, driven by
//!   [`MIX_TABLE`]. Each [`MixBlock`] loops over its lead band's edges, then
//!   the other band's edges, then each term and sign, so the emission order
//!   is fixed by the table. Later deduplication keeps the first product seen
//!   for a key, which makes that order observable.
//!
//! `A` is always the first band of the pair and `B` the second; aggressors
//! are recorded as `[A, B]` whichever band leads the term.

use tracing::debug;

use crate::analysis::AnalysisOptions;
use crate::band::{Band, Edge};
use crate::product::{InterferenceProduct, ProductType};
use crate::scan::VictimScan;

/// Which band of the pair supplies the leading term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    A,
    B,
}

/// How a coefficient is written in a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermFmt {
    /// `x`
    Bare,
    /// `n×x`
    Times(u8),
    /// `2×(2×x)`, a doubled second harmonic
    DoubledHarmonic,
}

impl TermFmt {
    fn render(&self, x: &str) -> String {
        match self {
            TermFmt::Bare => x.to_string(),
            TermFmt::Times(n) => format!("{}×{}", n, x),
            TermFmt::DoubledHarmonic => format!("2×(2×{})", x),
        }
    }
}

/// One `lead_coef·L ± other_coef·O` family.
#[derive(Debug, Clone, Copy)]
pub struct MixTerm {
    pub product_type: ProductType,
    pub subtype: &'static str,
    pub lead_coef: i32,
    pub other_coef: i32,
    pub signs: &'static [i32],
    pub lead_fmt: TermFmt,
    pub other_fmt: TermFmt,
}

impl MixTerm {
    pub fn frequency(&self, lead: f64, other: f64, sign: i32) -> f64 {
        self.lead_coef as f64 * lead + (sign * self.other_coef) as f64 * other
    }

    fn details_prefix(&self) -> String {
        match self.product_type {
            ProductType::IM3 => format!("IM3 ({})", self.subtype),
            other => other.as_str().to_string(),
        }
    }
}

/// Terms sharing a lead band and an edge loop.
#[derive(Debug, Clone, Copy)]
pub struct MixBlock {
    pub lead: Lead,
    pub terms: &'static [MixTerm],
}

const MINUS_PLUS: &[i32] = &[-1, 1];
const PLUS: &[i32] = &[1];

const fn term(
    product_type: ProductType,
    subtype: &'static str,
    lead_coef: i32,
    other_coef: i32,
    signs: &'static [i32],
    lead_fmt: TermFmt,
    other_fmt: TermFmt,
) -> MixTerm {
    MixTerm {
        product_type,
        subtype,
        lead_coef,
        other_coef,
        signs,
        lead_fmt,
        other_fmt,
    }
}

const FUND_A: &[MixTerm] = &[term(
    ProductType::IM3,
    "Fundamental-only",
    2,
    1,
    MINUS_PLUS,
    TermFmt::Times(2),
    TermFmt::Bare,
)];
const FUND_B: &[MixTerm] = FUND_A;
const HARM_A: &[MixTerm] = &[term(
    ProductType::IM3,
    "2nd Harmonic of A vs Fundamental B",
    4,
    1,
    MINUS_PLUS,
    TermFmt::DoubledHarmonic,
    TermFmt::Bare,
)];
const HARM_B: &[MixTerm] = &[term(
    ProductType::IM3,
    "2nd Harmonic of B vs Fundamental A",
    4,
    1,
    MINUS_PLUS,
    TermFmt::DoubledHarmonic,
    TermFmt::Bare,
)];
const BOTH_A: &[MixTerm] = &[term(
    ProductType::IM3,
    "2nd Harmonic of A vs 2nd Harmonic of B",
    2,
    2,
    MINUS_PLUS,
    TermFmt::Times(2),
    TermFmt::Times(2),
)];
const BOTH_B: &[MixTerm] = &[term(
    ProductType::IM3,
    "2nd Harmonic of B vs 2nd Harmonic of A",
    2,
    2,
    MINUS_PLUS,
    TermFmt::Times(2),
    TermFmt::Times(2),
)];
const IM4_TERMS: &[MixTerm] = &[
    term(ProductType::IM4, "Higher-order", 2, 2, PLUS, TermFmt::Times(2), TermFmt::Times(2)),
    term(ProductType::IM4, "Higher-order", 3, 1, PLUS, TermFmt::Times(3), TermFmt::Times(1)),
    term(ProductType::IM4, "Higher-order", 1, 3, PLUS, TermFmt::Times(1), TermFmt::Times(3)),
];
const IM5_TERMS: &[MixTerm] = &[
    term(ProductType::IM5, "Higher-order", 3, 2, MINUS_PLUS, TermFmt::Times(3), TermFmt::Times(2)),
    term(ProductType::IM5, "Higher-order", 2, 3, MINUS_PLUS, TermFmt::Times(2), TermFmt::Times(3)),
];
const IM7_TERMS: &[MixTerm] = &[term(
    ProductType::IM7,
    "Higher-order",
    4,
    3,
    MINUS_PLUS,
    TermFmt::Times(4),
    TermFmt::Times(3),
)];

/// Mixing blocks in emission order.
pub const MIX_TABLE: &[MixBlock] = &[
    MixBlock { lead: Lead::A, terms: FUND_A },
    MixBlock { lead: Lead::B, terms: FUND_B },
    MixBlock { lead: Lead::A, terms: HARM_A },
    MixBlock { lead: Lead::B, terms: HARM_B },
    MixBlock { lead: Lead::A, terms: BOTH_A },
    MixBlock { lead: Lead::B, terms: BOTH_B },
    MixBlock { lead: Lead::A, terms: IM4_TERMS },
    MixBlock { lead: Lead::A, terms: IM5_TERMS },
    MixBlock { lead: Lead::A, terms: IM7_TERMS },
];

fn enabled(product_type: ProductType, options: &AnalysisOptions) -> bool {
    match product_type {
        ProductType::IM2 => options.imd2,
        ProductType::IM4 => options.imd4,
        ProductType::IM5 => options.imd5,
        ProductType::IM7 => options.imd7,
        _ => true,
    }
}

fn nonzero_edges(band: &Band) -> impl Iterator<Item = (Edge, f64)> {
    band.tx_edges().into_iter().filter(|&(_, v)| v != 0.0)
}

fn op_str(sign: i32) -> &'static str {
    if sign > 0 {
        "+"
    } else {
        "-"
    }
}

/// IM2 beat products for the unordered pair `(a, b)`.
pub fn beat_products(a: &Band, b: &Band, scan: &VictimScan<'_>, out: &mut Vec<InterferenceProduct>) {
    if a.is_receive_only() || b.is_receive_only() {
        return;
    }
    let aggressors = [a, b];
    let codes = [&a.code, &b.code];
    for (ea, fa) in nonzero_edges(a) {
        for (eb, fb) in nonzero_edges(b) {
            for sign in [1, -1] {
                let freq = fa + sign as f64 * fb;
                if freq > 0.0 {
                    let op = op_str(sign);
                    let template = InterferenceProduct::new(
                        ProductType::IM2,
                        format!("{} {} {}", a.edge_label(ea), op, b.edge_label(eb)),
                        freq,
                    )
                    .with_subtype("Beat Frequency")
                    .with_aggressors(&codes)
                    .with_coefficients(1, sign)
                    .with_details(format!(
                        "IM2 Beat: {} {} {} = {:.1} MHz (A={}, B={})",
                        fa, op, fb, freq, a.code, b.code
                    ));
                    scan.emit(template, freq, &aggressors, out);
                }

                if sign < 0 {
                    let reverse = fb - fa;
                    if reverse > 0.0 {
                        let template = InterferenceProduct::new(
                            ProductType::IM2,
                            format!("{} - {}", b.edge_label(eb), a.edge_label(ea)),
                            reverse,
                        )
                        .with_subtype("Beat Frequency")
                        .with_aggressors(&codes)
                        .with_coefficients(-1, 1)
                        .with_details(format!(
                            "IM2 Beat: {} - {} = {:.1} MHz (B={}, A={})",
                            fb, fa, reverse, b.code, a.code
                        ));
                        scan.emit(template, reverse, &aggressors, out);
                    }
                }
            }
        }
    }
}

/// Table-driven mixing products for the ordered pair `(a, b)`.
pub fn mixing_products(
    a: &Band,
    b: &Band,
    options: &AnalysisOptions,
    scan: &VictimScan<'_>,
    out: &mut Vec<InterferenceProduct>,
) {
    if a.is_receive_only() || b.is_receive_only() {
        return;
    }
    let aggressors = [a, b];
    let codes = [&a.code, &b.code];

    for block in MIX_TABLE {
        let terms: Vec<&MixTerm> = block
            .terms
            .iter()
            .filter(|t| enabled(t.product_type, options))
            .collect();
        if terms.is_empty() {
            continue;
        }
        let (lead, other) = match block.lead {
            Lead::A => (a, b),
            Lead::B => (b, a),
        };
        let roles = match block.lead {
            Lead::A => format!("A={}, B={}", a.code, b.code),
            Lead::B => format!("B={}, A={}", b.code, a.code),
        };

        for (le, lf) in nonzero_edges(lead) {
            for (oe, of) in nonzero_edges(other) {
                for t in &terms {
                    for &sign in t.signs {
                        let freq = t.frequency(lf, of, sign);
                        let op = op_str(sign);
                        let formula = format!(
                            "{} {} {}",
                            t.lead_fmt.render(&lead.edge_label(le)),
                            op,
                            t.other_fmt.render(&other.edge_label(oe))
                        );
                        let details = format!(
                            "{}: {} {} {} = {:.1} MHz ({})",
                            t.details_prefix(),
                            t.lead_fmt.render(&lf.to_string()),
                            op,
                            t.other_fmt.render(&of.to_string()),
                            freq,
                            roles
                        );
                        let (m, n) = match block.lead {
                            Lead::A => (t.lead_coef, sign * t.other_coef),
                            Lead::B => (sign * t.other_coef, t.lead_coef),
                        };
                        let template = InterferenceProduct::new(t.product_type, formula, freq)
                            .with_subtype(t.subtype)
                            .with_aggressors(&codes)
                            .with_coefficients(m, n)
                            .with_details(details);
                        scan.emit(template, freq, &aggressors, out);
                    }
                }
            }
        }
    }
}

/// IM2 over unordered pairs of the selection.
pub fn generate_beats(bands: &[Band], options: &AnalysisOptions) -> Vec<InterferenceProduct> {
    let mut out = Vec::new();
    if !options.imd2 {
        return out;
    }
    let scan = VictimScan::new(bands, options.guard_mhz);
    for (i, a) in bands.iter().enumerate() {
        for b in &bands[i + 1..] {
            beat_products(a, b, &scan, &mut out);
        }
    }
    debug!(count = out.len(), "IM2 products generated");
    out
}

/// IM3 and enabled higher orders over ordered pairs of the selection.
pub fn generate_mixing(bands: &[Band], options: &AnalysisOptions) -> Vec<InterferenceProduct> {
    let scan = VictimScan::new(bands, options.guard_mhz);
    let mut out = Vec::new();
    for (i, a) in bands.iter().enumerate() {
        for (j, b) in bands.iter().enumerate() {
            if i != j {
                mixing_products(a, b, options, &scan, &mut out);
            }
        }
    }
    debug!(count = out.len(), "mixing products generated");
    out
}
