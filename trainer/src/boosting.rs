use dataset::{Examples, encode::argmax};
use gbdt::{
    config::Config,
    decision_tree::{Data, DataVec, ValueType},
    gradient_boost::GBDT,
};
use log::{debug, info};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::{Result, TrainErr},
    estimator::{Estimator, TrainedModel},
};

const NAME: &str = "boosting";

/// Gradient-boosted trees for multi-class data, one booster per class (one-vs-rest).
///
/// Every booster is fit with a log-likelihood loss on `+1` (its class) / `-1` (the rest)
/// targets. The per-class boosters are fit concurrently on a pool of `nthread` threads.
#[derive(Debug, Clone)]
pub struct BoostedTrees {
    rounds: usize,
    max_depth: u32,
    shrinkage: f32,
    nthread: usize,
}

impl BoostedTrees {
    /// Returns a new `BoostedTrees`.
    ///
    /// # Arguments
    /// * `rounds` - The amount of boosting iterations per class.
    /// * `max_depth` - The maximum depth of every tree.
    /// * `shrinkage` - The learning rate applied to every tree.
    /// * `nthread` - The amount of threads used for fitting.
    pub fn new(rounds: usize, max_depth: u32, shrinkage: f32, nthread: usize) -> Self {
        Self {
            rounds,
            max_depth,
            shrinkage,
            nthread,
        }
    }

    fn booster_config(&self, num_features: usize) -> Config {
        let mut cfg = Config::new();
        cfg.set_feature_size(num_features);
        cfg.set_max_depth(self.max_depth);
        cfg.set_iterations(self.rounds);
        cfg.set_shrinkage(self.shrinkage as ValueType);
        cfg.set_loss("LogLikelyhood");
        cfg.set_debug(false);
        cfg
    }

    fn fit_class(&self, cfg: &Config, train: &Examples, class: usize) -> GBDT {
        let mut data: DataVec = train
            .features()
            .rows()
            .into_iter()
            .zip(train.labels())
            .map(|(row, &label)| {
                let target = if label == class { 1.0 } else { -1.0 };
                Data::new_training_data(to_values(row), 1.0, target, None)
            })
            .collect();

        let mut booster = GBDT::new(cfg);
        booster.fit(&mut data);
        debug!("fitted booster for class {class}");
        booster
    }
}

impl Estimator for BoostedTrees {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(&self, train: &Examples) -> Result<Box<dyn TrainedModel>> {
        info!(
            "fitting {} boosters on {} rows, {} features, {} rounds",
            train.num_classes(),
            train.num_rows(),
            train.num_features(),
            self.rounds
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.nthread)
            .build()
            .map_err(|e| TrainErr::Backend {
                estimator: NAME,
                msg: e.to_string(),
            })?;

        let cfg = self.booster_config(train.num_features());
        let boosters: Vec<GBDT> = pool.install(|| {
            (0..train.num_classes())
                .into_par_iter()
                .map(|class| self.fit_class(&cfg, train, class))
                .collect()
        });

        Ok(Box::new(FittedBoosters {
            boosters,
            feature_names: train.feature_names().to_vec(),
        }))
    }
}

struct FittedBoosters {
    boosters: Vec<GBDT>,
    feature_names: Vec<String>,
}

/// The on-disk form of the fitted boosters.
#[derive(Serialize)]
struct BoostingArtifact<'a> {
    kind: &'static str,
    num_class: usize,
    feature_names: &'a [String],
    boosters: &'a [GBDT],
}

impl TrainedModel for FittedBoosters {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        if features.ncols() != self.feature_names.len() {
            return Err(TrainErr::Backend {
                estimator: NAME,
                msg: format!(
                    "expected {} features, got {}",
                    self.feature_names.len(),
                    features.ncols()
                ),
            });
        }

        let data: DataVec = features
            .rows()
            .into_iter()
            .map(|row| Data::new_test_data(to_values(row), None))
            .collect();

        // one score vector per class, each holding a score per row
        let scores: Vec<Vec<ValueType>> = self.boosters.iter().map(|b| b.predict(&data)).collect();

        let predictions = (0..data.len())
            .map(|row| {
                let row_scores: Vec<f64> = scores.iter().map(|s| s[row] as f64).collect();
                argmax(&row_scores).unwrap_or_default()
            })
            .collect();

        Ok(predictions)
    }

    fn to_json(&self) -> Result<Vec<u8>> {
        let artifact = BoostingArtifact {
            kind: "one_vs_rest_gbdt",
            num_class: self.boosters.len(),
            feature_names: &self.feature_names,
            boosters: &self.boosters,
        };

        Ok(serde_json::to_vec(&artifact)?)
    }
}

fn to_values(row: ArrayView1<'_, f64>) -> Vec<ValueType> {
    row.iter().map(|&x| x as ValueType).collect()
}
