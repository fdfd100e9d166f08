//! Disparador de feedback háptico.
//!
//! La vibración es una capacidad de la plataforma del cliente. El motor la
//! recibe como un puerto opcional: donde no hay controlador instalado (todas
//! las compilaciones de servidor) cada disparo es un no-op silencioso.

use std::sync::Arc;

/// Intención del pulso háptico solicitado por la interfaz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HapticIntent {
    Light,
    #[default]
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
}

impl HapticIntent {
    /// Mapea un nombre en minúsculas; cualquier valor desconocido cae en
    /// `Medium`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::Light,
            "medium" => Self::Medium,
            "heavy" => Self::Heavy,
            "success" => Self::Success,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Medium,
        }
    }

    /// Patrón fijo de vibración en milisegundos, alternando
    /// encendido/apagado.
    pub fn pattern(self) -> &'static [u64] {
        match self {
            Self::Light => &[10],
            Self::Medium => &[25],
            Self::Heavy => &[50],
            Self::Success => &[10, 40, 10],
            Self::Warning => &[25, 60, 25],
            Self::Error => &[50, 80, 50],
        }
    }
}

/// Puerto hacia la capacidad de vibración de la plataforma anfitriona.
pub trait Vibrator: Send + Sync {
    fn vibrate(&self, pattern: &[u64]);
}

/// Motor de feedback háptico con controlador opcional.
#[derive(Clone, Default)]
pub struct Haptics {
    driver: Option<Arc<dyn Vibrator>>,
}

impl Haptics {
    /// Motor sin capacidad instalada: todos los disparos son no-ops.
    pub fn unsupported() -> Self {
        Self { driver: None }
    }

    pub fn with_driver(driver: Arc<dyn Vibrator>) -> Self {
        Self {
            driver: Some(driver),
        }
    }

    /// Disparo de mejor esfuerzo; nunca falla ni bloquea al llamante.
    pub fn trigger(&self, intent: HapticIntent) {
        let Some(driver) = &self.driver else {
            log::debug!("haptics: no driver installed, dropping {:?}", intent);
            return;
        };
        driver.vibrate(intent.pattern());
    }

    pub fn press(&self) {
        self.trigger(HapticIntent::Light);
    }

    pub fn success(&self) {
        self.trigger(HapticIntent::Success);
    }

    pub fn error(&self) {
        self.trigger(HapticIntent::Error);
    }

    pub fn warning(&self) {
        self.trigger(HapticIntent::Warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingVibrator {
        calls: Mutex<Vec<Vec<u64>>>,
    }

    impl Vibrator for RecordingVibrator {
        fn vibrate(&self, pattern: &[u64]) {
            self.calls.lock().unwrap().push(pattern.to_vec());
        }
    }

    #[test]
    fn every_intent_maps_to_its_fixed_pattern() {
        let cases = [
            (HapticIntent::Light, vec![10]),
            (HapticIntent::Medium, vec![25]),
            (HapticIntent::Heavy, vec![50]),
            (HapticIntent::Success, vec![10, 40, 10]),
            (HapticIntent::Warning, vec![25, 60, 25]),
            (HapticIntent::Error, vec![50, 80, 50]),
        ];
        for (intent, expected) in cases {
            assert_eq!(intent.pattern(), expected.as_slice(), "{:?}", intent);
        }
    }

    #[test]
    fn unknown_names_fall_back_to_medium() {
        assert_eq!(HapticIntent::from_name("error"), HapticIntent::Error);
        assert_eq!(HapticIntent::from_name("light"), HapticIntent::Light);
        assert_eq!(HapticIntent::from_name("banana"), HapticIntent::Medium);
        assert_eq!(HapticIntent::from_name(""), HapticIntent::Medium);
        assert_eq!(HapticIntent::default(), HapticIntent::Medium);
    }

    #[test]
    fn trigger_forwards_the_table_pattern_to_the_driver() {
        let driver = Arc::new(RecordingVibrator::default());
        let haptics = Haptics::with_driver(driver.clone());

        haptics.trigger(HapticIntent::Success);
        haptics.press();

        let calls = driver.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[vec![10, 40, 10], vec![10]]);
    }

    #[test]
    fn missing_capability_is_a_silent_noop() {
        let haptics = Haptics::unsupported();
        haptics.trigger(HapticIntent::Heavy);
        haptics.success();
        haptics.error();
        haptics.warning();
    }

    #[test]
    fn wrappers_are_partial_applications_of_trigger() {
        let driver = Arc::new(RecordingVibrator::default());
        let haptics = Haptics::with_driver(driver.clone());

        haptics.success();
        haptics.error();
        haptics.warning();

        let calls = driver.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[
                HapticIntent::Success.pattern().to_vec(),
                HapticIntent::Error.pattern().to_vec(),
                HapticIntent::Warning.pattern().to_vec(),
            ]
        );
    }
}
