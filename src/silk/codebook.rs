//! Caller-supplied NLSF codebook description.
//!
//! The stage-1 vectors, per-coefficient weights, predictor tables and
//! residual iCDFs are versioned by bandwidth and prediction order, so they are
//! handed in by the integrating codec rather than compiled into this crate.
//! [`NlsfCodebook::validate`] checks that the slices agree with the declared
//! dimensions before a channel accepts the codebook.

use crate::silk::errors::{Result, SilkError};
use crate::silk::{FrameSignalType, MAX_LPC_ORDER, NLSF_QUANT_MAX_AMPLITUDE, is_supported_lpc_order};

/// Number of symbols in every stage-2 residual iCDF.
pub const NLSF_RESIDUAL_SYMBOLS: usize = 2 * NLSF_QUANT_MAX_AMPLITUDE as usize + 1;

/// Two-stage NLSF vector quantiser codebook.
#[derive(Debug, Clone, Copy)]
pub struct NlsfCodebook {
    /// Number of stage-1 vectors.
    pub n_vectors: usize,
    /// Prediction order, i.e. NLSF coefficients per vector.
    pub order: usize,
    /// Residual quantisation step, Q16.
    pub quant_step_size_q16: i16,
    /// Reciprocal of the step, Q6.
    pub inv_quant_step_size_q6: i16,
    /// Stage-1 vectors, `n_vectors * order` entries in Q8.
    pub cb1_nlsf_q8: &'static [u8],
    /// Stage-1 residual weights, `n_vectors * order` entries in Q9.
    pub cb1_wght_q9: &'static [i16],
    /// Stage-1 iCDFs: unvoiced/inactive first, voiced second.
    pub cb1_icdf: &'static [u8],
    /// Backward predictor coefficients, two interleaved sets of `order - 1`.
    pub pred_q8: &'static [u8],
    /// Packed residual table selectors and predictor choices, two per byte.
    pub ec_sel: &'static [u8],
    /// Concatenated stage-2 residual iCDFs.
    pub ec_icdf: &'static [u8],
    /// Minimum NLSF spacing, `order + 1` entries in Q15.
    pub delta_min_q15: &'static [i16],
}

/// Per-coefficient view of one stage-1 vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackedVector {
    /// Offsets of each coefficient's residual iCDF within `ec_icdf`.
    pub ec_ix: [usize; MAX_LPC_ORDER],
    /// Backward prediction weight of each coefficient.
    pub pred_q8: [u8; MAX_LPC_ORDER],
}

impl NlsfCodebook {
    /// Checks slice lengths and selector ranges against `order` and `n_vectors`.
    pub fn validate(&self) -> Result<()> {
        if !is_supported_lpc_order(self.order) {
            return Err(SilkError::UnsupportedOrder(self.order));
        }

        let order = self.order;
        let vectors = self.n_vectors;
        check_len("cb1_nlsf_q8", vectors * order, self.cb1_nlsf_q8.len())?;
        check_len("cb1_wght_q9", vectors * order, self.cb1_wght_q9.len())?;
        check_len("cb1_icdf", 2 * vectors, self.cb1_icdf.len())?;
        check_len("pred_q8", 2 * (order - 1), self.pred_q8.len())?;
        check_len("ec_sel", vectors * order / 2, self.ec_sel.len())?;
        check_len("delta_min_q15", order + 1, self.delta_min_q15.len())?;

        let tables = self.ec_icdf.len() / NLSF_RESIDUAL_SYMBOLS;
        check_len("ec_icdf", tables * NLSF_RESIDUAL_SYMBOLS, self.ec_icdf.len())?;
        let max_selector = self
            .ec_sel
            .iter()
            .map(|&entry| ((entry >> 1) & 7).max((entry >> 5) & 7))
            .max()
            .unwrap_or(0) as usize;
        if max_selector >= tables {
            return Err(SilkError::CodebookMismatch {
                table: "ec_icdf",
                expected: (max_selector + 1) * NLSF_RESIDUAL_SYMBOLS,
                actual: self.ec_icdf.len(),
            });
        }
        if self.cb1_wght_q9.contains(&0) {
            return Err(SilkError::CodebookMismatch {
                table: "cb1_wght_q9",
                expected: vectors * order,
                actual: self.cb1_wght_q9.iter().filter(|&&w| w != 0).count(),
            });
        }
        if self.delta_min_q15[order] < 1 {
            return Err(SilkError::CodebookMismatch {
                table: "delta_min_q15",
                expected: order + 1,
                actual: order,
            });
        }
        let spacing: i32 = self.delta_min_q15.iter().map(|&d| i32::from(d)).sum();
        if spacing > 1 << 15 || self.delta_min_q15.iter().any(|&d| d < 0) {
            return Err(SilkError::SpacingOverflow(spacing));
        }
        Ok(())
    }

    /// Stage-1 iCDF for frames of the given signal type.
    pub fn stage1_icdf(&self, signal_type: FrameSignalType) -> &'static [u8] {
        let start = (signal_type.index() >> 1) * self.n_vectors;
        &self.cb1_icdf[start..start + self.n_vectors]
    }

    /// Residual iCDF beginning at `offset` (as returned by [`Self::unpack`]).
    pub fn residual_icdf(&self, offset: usize) -> &'static [u8] {
        &self.ec_icdf[offset..offset + NLSF_RESIDUAL_SYMBOLS]
    }

    /// Stage-1 vector `stage1` in Q8.
    pub fn stage1_vector(&self, stage1: usize) -> &'static [u8] {
        let start = stage1 * self.order;
        &self.cb1_nlsf_q8[start..start + self.order]
    }

    /// Stage-1 residual weights for `stage1` in Q9.
    pub fn stage1_weights(&self, stage1: usize) -> &'static [i16] {
        let start = stage1 * self.order;
        &self.cb1_wght_q9[start..start + self.order]
    }

    /// Expands the packed selectors of `stage1` into residual table offsets and
    /// predictor weights.
    ///
    /// # Panics
    ///
    /// Panics if `stage1 >= n_vectors`. Decoded indices are range-checked
    /// before they reach this point.
    pub fn unpack(&self, stage1: usize) -> UnpackedVector {
        assert!(stage1 < self.n_vectors, "stage-1 index {stage1} out of range");

        let order = self.order;
        let stride = order / 2;
        let selectors = &self.ec_sel[stage1 * stride..(stage1 + 1) * stride];
        let pred_period = order - 1;

        let mut out = UnpackedVector {
            ec_ix: [0; MAX_LPC_ORDER],
            pred_q8: [0; MAX_LPC_ORDER],
        };
        for (pair, &entry) in selectors.iter().enumerate() {
            let i = 2 * pair;
            out.ec_ix[i] = usize::from((entry >> 1) & 7) * NLSF_RESIDUAL_SYMBOLS;
            out.pred_q8[i] = self.pred_q8[i + usize::from(entry & 1) * pred_period];
            out.ec_ix[i + 1] = usize::from((entry >> 5) & 7) * NLSF_RESIDUAL_SYMBOLS;
            out.pred_q8[i + 1] = self.pred_q8[i + usize::from((entry >> 4) & 1) * pred_period + 1];
        }
        out
    }
}

fn check_len(table: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SilkError::CodebookMismatch {
            table,
            expected,
            actual,
        })
    }
}
