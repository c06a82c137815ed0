use crate::domain::error::DomainError;

/// Euclidean norm, accumulated in f64.
pub fn magnitude(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| {
            let x = *x as f64;
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, in [-1, 1].
///
/// Mismatched dimensions and zero-magnitude inputs are rejected instead of
/// producing NaN or a silent zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, DomainError> {
    if a.len() != b.len() {
        return Err(DomainError::InvalidVector(format!(
            "Dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(DomainError::InvalidVector("Empty vector".into()));
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return Err(DomainError::InvalidVector("Zero-magnitude vector".into()));
    }
    let cos = dot / denom;
    if !dot.is_finite() || !denom.is_finite() || !cos.is_finite() {
        return Err(DomainError::InvalidVector("Non-finite vector component".into()));
    }
    // Rounding can push |cos| slightly past 1.
    Ok(cos.clamp(-1.0, 1.0))
}

/// True when every component is a finite number.
pub fn is_finite(v: &[f32]) -> bool {
    v.iter().all(|x| x.is_finite())
}
