//! Shared data for unit tests.
//!
//! A fixed 5 x 10 reference set and a 10-dimensional probe vector, together
//! with precomputed measure scores and p-values that pin the numeric
//! behavior of the measures and the predictor.
use crate::data::Matrix;

/// The probe vector scored against the reference set.
pub fn probe() -> Vec<f64> {
    vec![
        0.227606514087,
        3.19756309191,
        3.99676324207,
        2.2618963427,
        4.9096869819,
        9.36106523154,
        9.2442539595,
        5.69251642812,
        1.74739742778,
        5.12675778168,
    ]
}

/// Five 10-dimensional reference objects, one per row.
pub fn reference() -> Matrix<f64> {
    Matrix::from_vecs(&[
        vec![
            0.241379816431,
            3.07772645586,
            0.266095771065,
            6.96496842189,
            2.05604416791,
            4.53735749296,
            0.678355345234,
            5.11754104077,
            7.36610695022,
            0.220108218584,
        ],
        vec![
            1.07744114334,
            7.58963734813,
            2.80211737997,
            7.74580533536,
            2.55748547234,
            6.59702669393,
            0.0217942493459,
            2.87192707468,
            8.1254030898,
            0.12792624235,
        ],
        vec![
            6.43718139931,
            4.63421513939,
            8.83766794716,
            2.13536933171,
            5.00237682514,
            1.88638458727,
            0.495493646824,
            8.26242412914,
            4.66560025836,
            4.19530119089,
        ],
        vec![
            6.37843328926,
            4.62934620171,
            7.15672856837,
            6.88007474688,
            9.08575265749,
            8.20903783949,
            9.77601785473,
            7.01985296071,
            4.26624048173,
            2.15619714096,
        ],
        vec![
            1.26382287509,
            3.91332311469,
            5.94718827214,
            0.605738745779,
            4.64205323548,
            7.16015438495,
            6.32264821969,
            9.61285117591,
            4.90480877531,
            8.64990456322,
        ],
    ])
}

/// Sum of the 3 smallest Euclidean distances from the probe to the rows.
pub const KNN_SCORE_K3: f64 = 32.084521147624933;

/// Sum of all 5 Euclidean distances from the probe to the rows.
pub const KNN_SCORE_ALL: f64 = 61.606577966581696;

/// Bandwidth used for the KDE fixture score.
pub const KDE_H: f64 = 0.1;

/// Gaussian KDE score of the probe at bandwidth [`KDE_H`].
pub const KDE_SCORE: f64 = -664903800.66905415;

/// Deterministic p-value of the probe under KNN(3): 5 of the 6 augmented
/// members score at least as high as the probe.
pub const CP_KNN_PVALUE: f64 = 5.0 / 6.0;

/// Deterministic p-value of the probe under KDE(0.1): the bandwidth is so
/// narrow that every augmented member scores identically.
pub const CP_KDE_PVALUE: f64 = 1.0;
