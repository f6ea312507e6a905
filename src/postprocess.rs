use ndarray::Array1;

/// Applies softmax to a 1D array (slice) and returns a new Array1<f32>.
pub fn softmax(slice: &Array1<f32>) -> Array1<f32> {
    let max_val = slice.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Array1<f32> = slice.mapv(|x| (x - max_val).exp());
    let sum_exp: f32 = exp_vals.sum();
    exp_vals.mapv(|v| v / sum_exp)
}

pub fn argmax_and_max(softmaxed: &Array1<f32>) -> (usize, f32) {
    softmaxed
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(max_idx, max_val), (i, &val)| {
            if val > max_val { (i, val) } else { (max_idx, max_val) }
        })
}

/// Raw class scores to (predicted index, confidence).
pub fn predict_class(scores: &[f32]) -> (usize, f32) {
    let probabilities = softmax(&Array1::from_vec(scores.to_vec()));
    argmax_and_max(&probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_is_a_probability_distribution() {
        let probs = softmax(&Array1::from_vec(vec![1.0, 2.0, 3.0, -4.0]));
        let sum: f32 = probs.sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn softmax_preserves_ordering() {
        let probs = softmax(&Array1::from_vec(vec![0.1, 5.0, 2.0]));
        assert!(probs[1] > probs[2] && probs[2] > probs[0]);
    }

    #[test]
    fn argmax_picks_the_largest_entry() {
        let (idx, conf) = argmax_and_max(&Array1::from_vec(vec![0.1, 0.7, 0.2]));
        assert_eq!(idx, 1);
        assert!((conf - 0.7).abs() < 1e-6);
    }

    #[test]
    fn predict_class_composes_both() {
        let (idx, conf) = predict_class(&[0.0, 0.0, 9.0, 0.0]);
        assert_eq!(idx, 2);
        assert!(conf > 0.9);
    }
}
