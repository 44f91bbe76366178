//! Reconstruction of a quantised NLSF vector from its codebook indices.
//!
//! The stage-2 residual is dequantised back to front through a first-order
//! predictor, weighted by the stage-1 vector's inverse weights, added to the
//! stage-1 vector and finally stabilised.

use crate::silk::MAX_LPC_ORDER;
use crate::silk::codebook::NlsfCodebook;
use crate::silk::fixed::{smlawb, smulbb};
use crate::silk::nlsf_stabilize::nlsf_stabilize;

/// 0.1 in Q10, pulls non-zero residual levels towards zero.
const NLSF_QUANT_LEVEL_ADJ_Q10: i32 = 102;

/// Decodes `nlsf_q15` from a stage-1 index and `order` centred residuals.
///
/// `stage1` must be below `codebook.n_vectors`. Residuals are the decoded
/// stage-2 symbols minus the centring offset.
pub fn nlsf_decode(nlsf_q15: &mut [i16], stage1: usize, residuals: &[i8], codebook: &NlsfCodebook) {
    let order = codebook.order;
    assert_eq!(nlsf_q15.len(), order, "output buffer must match codebook order");
    assert_eq!(residuals.len(), order, "one residual per coefficient");

    let unpacked = codebook.unpack(stage1);

    let mut res_q10 = [0i16; MAX_LPC_ORDER];
    residual_dequant(
        &mut res_q10[..order],
        residuals,
        &unpacked.pred_q8[..order],
        i32::from(codebook.quant_step_size_q16),
    );

    let base_q8 = codebook.stage1_vector(stage1);
    let weights_q9 = codebook.stage1_weights(stage1);
    for i in 0..order {
        let correction = (i32::from(res_q10[i]) << 14) / i32::from(weights_q9[i]);
        let value = correction + (i32::from(base_q8[i]) << 7);
        nlsf_q15[i] = value.clamp(0, 32_767) as i16;
    }

    nlsf_stabilize(nlsf_q15, codebook.delta_min_q15);
}

/// Backward-predicted residual dequantisation into Q10.
fn residual_dequant(out_q10: &mut [i16], indices: &[i8], pred_q8: &[u8], step_q16: i32) {
    let mut prev_q10 = 0i32;
    for i in (0..out_q10.len()).rev() {
        let pred_q10 = smulbb(prev_q10, i32::from(pred_q8[i])) >> 8;

        let mut level_q10 = i32::from(indices[i]) << 10;
        if level_q10 > 0 {
            level_q10 -= NLSF_QUANT_LEVEL_ADJ_Q10;
        } else if level_q10 < 0 {
            level_q10 += NLSF_QUANT_LEVEL_ADJ_Q10;
        }

        prev_q10 = smlawb(pred_q10, level_q10, step_q16);
        out_q10[i] = prev_q10 as i16;
    }
}
