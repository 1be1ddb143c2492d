//! Multicollinearity diagnostics over numeric dataset columns.
//!
//! Produces a Pearson correlation matrix, the list of strongly correlated
//! pairs and a variance inflation factor per feature. With a target column
//! it also fits an ordinary least squares regression of the target on the
//! remaining features and summarizes its residuals. Undefined values
//! (constant columns, singular matrices) are reported as `None`, which
//! serializes to JSON `null`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{csv_reader, DatasetError, CRASH_COLUMN, PERCEPTION_FEATURES};

pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.8;

/// Pivot magnitude below which the correlation matrix counts as singular.
const SINGULAR_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub feature_a: String,
    pub feature_b: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVif {
    pub feature: String,
    pub vif: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub rows: usize,
    pub threshold: f64,
    pub features: Vec<String>,
    pub correlation: Vec<Vec<Option<f64>>>,
    pub high_correlation_pairs: Vec<CorrelatedPair>,
    pub vif: Vec<FeatureVif>,
    #[serde(default)]
    pub regression: Option<RegressionFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCoefficient {
    pub feature: String,
    pub coefficient: f64,
}

/// Least squares fit of `target` on the other analyzed features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    pub target: String,
    pub intercept: f64,
    pub coefficients: Vec<FeatureCoefficient>,
    /// `None` when the target is constant.
    pub r_squared: Option<f64>,
    pub residual_mean: f64,
    /// Sample standard deviation; zero for fewer than two rows.
    pub residual_std: f64,
}

fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len();
    if n < 2 || n != b.len() {
        return None;
    }
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return None;
    }
    Some((cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlation between columns.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<Option<f64>>> {
    let k = columns.len();
    let mut matrix = vec![vec![None; k]; k];
    for i in 0..k {
        for j in 0..=i {
            let r = if i == j {
                pearson(&columns[i], &columns[i]).map(|_| 1.0)
            } else {
                pearson(&columns[i], &columns[j])
            };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Pairs below the diagonal with `|r| > threshold`, row-major order.
pub fn high_correlation_pairs(
    features: &[String],
    matrix: &[Vec<Option<f64>>],
    threshold: f64,
) -> Vec<CorrelatedPair> {
    let mut pairs = Vec::new();
    for i in 0..features.len() {
        for j in 0..i {
            if let Some(r) = matrix[i][j] {
                if r.abs() > threshold {
                    pairs.push(CorrelatedPair {
                        feature_a: features[i].clone(),
                        feature_b: features[j].clone(),
                        correlation: r,
                    });
                }
            }
        }
    }
    pairs
}

/// Gauss-Jordan inverse with partial pivoting. `None` when singular.
fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))?;
        if a[pivot][col].abs() < SINGULAR_EPS {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for j in 0..n {
            a[col][j] /= p;
            inv[col][j] /= p;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}

/// VIF of each feature: the diagonal of the inverse correlation matrix.
pub fn variance_inflation_factors(
    features: &[String],
    matrix: &[Vec<Option<f64>>],
) -> Vec<FeatureVif> {
    let dense: Option<Vec<Vec<f64>>> = matrix
        .iter()
        .map(|row| row.iter().copied().collect::<Option<Vec<f64>>>())
        .collect();
    let inverse = dense.as_deref().and_then(invert);

    features
        .iter()
        .enumerate()
        .map(|(i, f)| FeatureVif {
            feature: f.clone(),
            vif: inverse.as_ref().map(|inv| inv[i][i]),
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Regress `y` on `predictors` with an intercept.
///
/// Solves the normal equations on mean-centered columns, so the intercept
/// falls out as `mean(y) - sum(beta_j * mean(x_j))`. Returns `None` for an
/// empty dataset or when the predictors are collinear (including constant).
pub fn fit_least_squares(
    target: &str,
    y: &[f64],
    names: &[String],
    predictors: &[Vec<f64>],
) -> Option<RegressionFit> {
    let n = y.len();
    if n == 0 || predictors.iter().any(|x| x.len() != n) {
        return None;
    }
    let y_mean = mean(y);
    let x_means: Vec<f64> = predictors.iter().map(|x| mean(x)).collect();
    let centered: Vec<Vec<f64>> = predictors
        .iter()
        .zip(&x_means)
        .map(|(x, m)| x.iter().map(|v| v - m).collect())
        .collect();

    let p = centered.len();
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for i in 0..p {
        for j in 0..=i {
            let dot: f64 = centered[i].iter().zip(&centered[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
        xty[i] = centered[i].iter().zip(y).map(|(a, b)| a * (b - y_mean)).sum();
    }
    let inverse = if p == 0 { Vec::new() } else { invert(&xtx)? };
    let beta: Vec<f64> = inverse
        .iter()
        .map(|row| row.iter().zip(&xty).map(|(a, b)| a * b).sum())
        .collect();
    let intercept = y_mean - beta.iter().zip(&x_means).map(|(b, m)| b * m).sum::<f64>();

    let residuals: Vec<f64> = (0..n)
        .map(|r| {
            let fitted = intercept + beta.iter().zip(predictors).map(|(b, x)| b * x[r]).sum::<f64>();
            y[r] - fitted
        })
        .collect();
    let ss_res: f64 = residuals.iter().map(|e| e * e).sum();
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let residual_mean = mean(&residuals);
    let residual_std = if n > 1 {
        (residuals
            .iter()
            .map(|e| (e - residual_mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64)
            .sqrt()
    } else {
        0.0
    };

    Some(RegressionFit {
        target: target.to_string(),
        intercept,
        coefficients: names
            .iter()
            .zip(beta)
            .map(|(feature, coefficient)| FeatureCoefficient {
                feature: feature.clone(),
                coefficient,
            })
            .collect(),
        r_squared: (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot),
        residual_mean,
        residual_std,
    })
}

/// Build the full report from named numeric columns. When `target` names one
/// of the features, it is regressed on all the others.
pub fn analyze(
    features: Vec<String>,
    columns: &[Vec<f64>],
    threshold: f64,
    target: Option<&str>,
) -> FeatureReport {
    let correlation = correlation_matrix(columns);
    let high_correlation_pairs = high_correlation_pairs(&features, &correlation, threshold);
    let vif = variance_inflation_factors(&features, &correlation);

    let regression = target.and_then(|t| {
        let idx = features.iter().position(|f| f == t)?;
        let (names, predictors): (Vec<String>, Vec<Vec<f64>>) = features
            .iter()
            .zip(columns)
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, (f, c))| (f.clone(), c.clone()))
            .unzip();
        let fit = fit_least_squares(t, &columns[idx], &names, &predictors);
        if fit.is_none() {
            log::warn!("regression on {} is undefined (collinear or empty data)", t);
        }
        fit
    });

    FeatureReport {
        rows: columns.first().map_or(0, Vec::len),
        threshold,
        features,
        correlation,
        high_correlation_pairs,
        vif,
        regression,
    }
}

/// Analyze `features` of a CSV file, or the perception columns (plus
/// `CrashOccurred` when labeled) if none are given. A `target` column is
/// added to the selection when missing. Rows with an unparsable value in any
/// selected column are left out.
pub fn analyze_csv(
    path: &Path,
    features: Option<&[String]>,
    threshold: f64,
    target: Option<&str>,
) -> Result<FeatureReport, DatasetError> {
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();

    if let Some(t) = target.filter(|t| !headers.iter().any(|h| h == *t)) {
        return Err(DatasetError::MissingColumns(vec![t.to_string()]));
    }

    let mut selected: Vec<String> = match features {
        Some(list) => {
            let missing: Vec<String> = list
                .iter()
                .filter(|f| !headers.iter().any(|h| h == f.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(DatasetError::MissingColumns(missing));
            }
            list.to_vec()
        }
        None => PERCEPTION_FEATURES
            .iter()
            .chain(std::iter::once(&CRASH_COLUMN))
            .filter(|f| headers.iter().any(|h| h == **f))
            .map(|f| f.to_string())
            .collect(),
    };
    if let Some(t) = target.filter(|t| !selected.iter().any(|f| f == t)) {
        selected.push(t.to_string());
    }
    let indices: Vec<usize> = selected
        .iter()
        .filter_map(|f| headers.iter().position(|h| h == f.as_str()))
        .collect();

    let mut columns = vec![Vec::new(); indices.len()];
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        let values: Option<Vec<f64>> = indices
            .iter()
            .map(|&i| record.get(i).and_then(|v| v.trim().parse::<f64>().ok()))
            .collect();
        match values {
            Some(values) => {
                for (column, v) in columns.iter_mut().zip(values) {
                    column.push(v);
                }
            }
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!("ignored {} rows with non-numeric values", dropped);
    }

    let report = analyze(selected, &columns, threshold, target);
    log::info!(
        "analyzed {} features over {} rows: {} highly correlated pairs",
        report.features.len(),
        report.rows,
        report.high_correlation_pairs.len()
    );
    if let Some(fit) = &report.regression {
        log::info!(
            "regression on {}: r2 {:?}, residual std {:.4}",
            fit.target,
            fit.r_squared,
            fit.residual_std
        );
    }
    Ok(report)
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &FeatureReport, path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
