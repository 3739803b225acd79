//! Session best score
//!
//! One session-scoped storage key holding the best score as a decimal
//! string ("12.3"). Read once at startup, written on every new best. When
//! storage is unavailable the value simply stays in memory for the session;
//! gameplay is never interrupted.

/// Best score for the current browser session, in tenths of a second
#[derive(Debug, Clone, Copy, Default)]
pub struct BestScore {
    tenths: u32,
}

impl BestScore {
    /// SessionStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gyro_serpent_best";

    pub fn tenths(&self) -> u32 {
        self.tenths
    }

    /// Best score in 1-decimal seconds
    pub fn seconds(&self) -> f32 {
        self.tenths as f32 / 10.0
    }

    /// Fold in a finished round's score. On a new best the value is
    /// persisted and true is returned.
    pub fn record(&mut self, score_tenths: u32) -> bool {
        if score_tenths <= self.tenths {
            return false;
        }
        self.tenths = score_tenths;
        self.save();
        true
    }

    /// Parse a stored decimal string. Absent, negative or non-numeric
    /// values all mean "no best yet".
    #[allow(dead_code)]
    fn parse(raw: &str) -> u32 {
        raw.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| (v * 10.0).round() as u32)
            .unwrap_or(0)
    }

    #[allow(dead_code)]
    fn to_storage_string(self) -> String {
        format!("{:.1}", self.seconds())
    }

    /// Load the session best from SessionStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(storage) = crate::platform::session_storage() {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                let best = Self {
                    tenths: Self::parse(&raw),
                };
                log::info!("Loaded session best: {:.1}", best.seconds());
                return best;
            }
        } else {
            log::warn!("Session storage unavailable, best score is volatile");
        }

        Self::default()
    }

    /// Persist the session best (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        match crate::platform::session_storage() {
            Some(storage) => {
                if storage
                    .set_item(Self::STORAGE_KEY, &self.to_storage_string())
                    .is_err()
                {
                    log::warn!("Best score write failed, keeping it in memory");
                }
            }
            None => log::warn!("Session storage unavailable, best score is volatile"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // In-memory only for native
    }
}
