//! Victim scan shared by the generators.

use crate::band::Band;
use crate::product::{round2, InterferenceProduct, Severity};
use crate::risk;

/// Tests a computed frequency against every selected receive window.
#[derive(Debug, Clone, Copy)]
pub struct VictimScan<'a> {
    bands: &'a [Band],
    guard_mhz: f64,
}

impl<'a> VictimScan<'a> {
    pub fn new(bands: &'a [Band], guard_mhz: f64) -> Self {
        Self { bands, guard_mhz }
    }

    pub fn bands(&self) -> &'a [Band] {
        self.bands
    }

    pub fn guard_mhz(&self) -> f64 {
        self.guard_mhz
    }

    /// Emit `template` once per victim whose guarded receive window holds
    /// its frequency, scored by [`risk::assess`] at the reported (2 dp)
    /// frequency, plus a single unscored copy if any selected band was
    /// missed. Victims keep selection order; the miss copy takes the
    /// position of the first missed band.
    pub fn emit(
        &self,
        template: InterferenceProduct,
        freq: f64,
        aggressors: &[&Band],
        out: &mut Vec<InterferenceProduct>,
    ) {
        let mut miss_emitted = false;
        let reported = round2(freq);
        for victim in self.bands {
            if victim.receives(freq, self.guard_mhz) {
                let severity = risk::assess(reported, victim, aggressors, template.product_type);
                out.push(
                    template
                        .clone()
                        .with_victim(Some(&victim.code))
                        .with_severity(severity),
                );
            } else if !miss_emitted {
                miss_emitted = true;
                out.push(template.clone().with_severity(Severity::SAFE));
            }
        }
    }
}
