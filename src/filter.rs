//! Constant-velocity Kalman filtering of simulated GPS traces, and the
//! keyed store that owns one filter per tracked vehicle.

use crate::geodesy::LatLng;
use cgmath::{Matrix, Matrix2, Matrix4, SquareMatrix, Vector2, Vector4};
use std::collections::HashMap;

/// Initial variance of the position components.
const INITIAL_POSITION_VARIANCE: f64 = 1e-3;

/// Initial variance of the velocity components.
const INITIAL_VELOCITY_VARIANCE: f64 = 1e-2;

/// Floor applied to the innovation-covariance determinant before
/// inversion, trading a small bias for guaranteed availability.
const DETERMINANT_FLOOR: f64 = 1e-12;

/// Minimum elapsed time between updates, in s. Guards against clock
/// jitter producing near-zero or negative steps.
const MIN_STEP_SECONDS: f64 = 1.0;

/// Noise parameters of a [KalmanFilter2d].
#[derive(Copy, Clone, Debug)]
pub struct FilterParams {
    /// White-noise-acceleration process variance.
    pub process_variance: f64,
    /// Variance of the position observation.
    pub measurement_variance: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            process_variance: 5e-7,
            measurement_variance: 2e-6,
        }
    }
}

/// A constant-velocity Kalman filter over a single 2D track.
///
/// The state vector is `[lat, lng, v_lat, v_lng]`, with velocities in
/// degrees per second. The filter is created empty and initialises itself
/// from the first observation, which it returns unsmoothed.
#[derive(Clone, Debug)]
pub struct KalmanFilter2d {
    params: FilterParams,
    /// State and covariance; `None` until the first observation.
    state: Option<(Vector4<f64>, Matrix4<f64>)>,
    /// Timestamp of the last update, in epoch seconds.
    last_timestamp: f64,
}

impl KalmanFilter2d {
    /// Creates an empty filter.
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            state: None,
            last_timestamp: 0.0,
        }
    }

    /// Feeds one observation through the filter and returns the position
    /// estimate.
    pub fn step(&mut self, timestamp: f64, raw: LatLng) -> LatLng {
        let Some((state, covariance)) = self.state else {
            self.state = Some((
                Vector4::new(raw.lat, raw.lng, 0.0, 0.0),
                Matrix4::from_diagonal(Vector4::new(
                    INITIAL_POSITION_VARIANCE,
                    INITIAL_POSITION_VARIANCE,
                    INITIAL_VELOCITY_VARIANCE,
                    INITIAL_VELOCITY_VARIANCE,
                )),
            ));
            self.last_timestamp = timestamp;
            return raw;
        };

        let dt = (timestamp - self.last_timestamp).max(MIN_STEP_SECONDS);
        self.last_timestamp = timestamp;

        let (state, covariance) = Self::predict(state, covariance, dt, self.params.process_variance);
        let (state, covariance) =
            Self::update(state, covariance, raw, self.params.measurement_variance);
        self.state = Some((state, covariance));

        LatLng::new(state.x, state.y)
    }

    /// Timestamp of the last update, in epoch seconds.
    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    /// The variance of the two position components, or `None` before the
    /// first observation.
    pub fn position_variance(&self) -> Option<(f64, f64)> {
        self.state.map(|(_, p)| (p.x.x, p.y.y))
    }

    /// Advances the state by `dt` under the constant-velocity model and
    /// propagates the covariance as `A·P·Aᵀ + Q`.
    fn predict(
        state: Vector4<f64>,
        covariance: Matrix4<f64>,
        dt: f64,
        process_variance: f64,
    ) -> (Vector4<f64>, Matrix4<f64>) {
        // Transition matrix: identity with dt coupling position to velocity.
        let a = Matrix4::from_cols(
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.0, 1.0, 0.0, 0.0),
            Vector4::new(dt, 0.0, 1.0, 0.0),
            Vector4::new(0.0, dt, 0.0, 1.0),
        );

        let state = a * state;

        // Discretized white-noise-acceleration process noise.
        let dt2 = dt * dt;
        let dt3 = dt2 * dt;
        let dt4 = dt3 * dt;
        let q = process_variance;
        let q_mat = Matrix4::from_cols(
            Vector4::new(0.25 * dt4 * q, 0.0, 0.5 * dt3 * q, 0.0),
            Vector4::new(0.0, 0.25 * dt4 * q, 0.0, 0.5 * dt3 * q),
            Vector4::new(0.5 * dt3 * q, 0.0, dt2 * q, 0.0),
            Vector4::new(0.0, 0.5 * dt3 * q, 0.0, dt2 * q),
        );

        (state, a * covariance * a.transpose() + q_mat)
    }

    /// Folds a direct position observation into the state.
    ///
    /// The observation matrix `H` selects the first two state components,
    /// so `P·Hᵀ` is the first two columns of `P` and `H·P·Hᵀ` its top-left
    /// 2×2 block; both are taken directly rather than materialising `H`.
    fn update(
        state: Vector4<f64>,
        covariance: Matrix4<f64>,
        observed: LatLng,
        measurement_variance: f64,
    ) -> (Vector4<f64>, Matrix4<f64>) {
        let pht = (covariance.x, covariance.y);

        // Innovation covariance S = H·P·Hᵀ + R.
        let s = Matrix2::new(
            covariance.x.x + measurement_variance,
            covariance.x.y,
            covariance.y.x,
            covariance.y.y + measurement_variance,
        );
        let s_inv = invert_2x2(s);

        // Kalman gain K = P·Hᵀ·S⁻¹, one 4-vector per observed component.
        let k0 = pht.0 * s_inv.x.x + pht.1 * s_inv.x.y;
        let k1 = pht.0 * s_inv.y.x + pht.1 * s_inv.y.y;

        let residual = Vector2::new(observed.lat - state.x, observed.lng - state.y);
        let state = state + k0 * residual.x + k1 * residual.y;

        // Covariance update (I − K·H)·P; K·H is K's columns padded with zeros.
        let kh = Matrix4::from_cols(k0, k1, Vector4::new(0.0, 0.0, 0.0, 0.0), Vector4::new(0.0, 0.0, 0.0, 0.0));
        let covariance = (Matrix4::identity() - kh) * covariance;

        (state, covariance)
    }
}

/// Inverts a 2×2 matrix in closed form, clamping the determinant away
/// from zero so a degenerate innovation covariance regularizes instead of
/// failing.
fn invert_2x2(m: Matrix2<f64>) -> Matrix2<f64> {
    let mut det = m.x.x * m.y.y - m.y.x * m.x.y;
    if det.abs() < DETERMINANT_FLOOR {
        det = DETERMINANT_FLOOR;
    }
    Matrix2::new(m.y.y, -m.x.y, -m.y.x, m.x.x) * (1.0 / det)
}

/// An owned store of per-vehicle filter state, keyed by a stable identity
/// string.
///
/// This is the one piece of long-lived mutable state in the simulation
/// core. It is injected into the simulator rather than held as ambient
/// state, and exclusive access is enforced through `&mut self`; wrap the
/// store in a lock to share it between threads.
#[derive(Default, Debug)]
pub struct FilterStore {
    params: FilterParams,
    filters: HashMap<String, KalmanFilter2d>,
}

impl FilterStore {
    /// Creates an empty store whose filters use the given parameters.
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            filters: HashMap::new(),
        }
    }

    /// Feeds an observation through the filter for `key`, creating the
    /// filter on first use.
    pub fn step(&mut self, key: &str, timestamp: f64, raw: LatLng) -> LatLng {
        match self.filters.get_mut(key) {
            Some(filter) => filter.step(timestamp, raw),
            None => {
                let mut filter = KalmanFilter2d::new(self.params);
                let estimate = filter.step(timestamp, raw);
                self.filters.insert(key.to_owned(), filter);
                estimate
            }
        }
    }

    /// Gets the filter for a key, if one exists.
    pub fn get(&self, key: &str) -> Option<&KalmanFilter2d> {
        self.filters.get(key)
    }

    /// The number of tracked keys.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Drops all filter state.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Drops filters that last saw an observation before `horizon`
    /// (epoch seconds). Keys the simulator no longer produces would
    /// otherwise accumulate for the life of the process.
    pub fn evict_older_than(&mut self, horizon: f64) {
        self.filters
            .retain(|_, filter| filter.last_timestamp() >= horizon);
    }
}
