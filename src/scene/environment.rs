use crate::Asset;
use serde::{Deserialize, Serialize};

/// Where the environment map comes from.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentSource {
    /// The offscreen background render stands in for a real map.
    Background,
    /// An equirectangular radiance map decoded from an HDR image.
    Equirect {
        pixels: Asset,
        width: u32,
        height: u32,
    },
}

/// Environment map state with a generation counter.
///
/// The source transitions from the procedural background to a loaded
/// radiance map at most once; later uploads are ignored so in-flight GPU
/// state never has to be rebuilt mid-session.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Environment {
    source: EnvironmentSource,
    generation: u32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            source: EnvironmentSource::Background,
            generation: 0,
        }
    }
}

impl Environment {
    /// Installs an equirectangular map, returning false if one is already
    /// installed.
    pub fn set_equirect(&mut self, pixels: Asset, width: u32, height: u32) -> bool {
        if self.generation != 0 {
            return false;
        }

        self.source = EnvironmentSource::Equirect {
            pixels,
            width,
            height,
        };
        self.generation = 1;

        true
    }

    pub fn is_fallback(&self) -> bool {
        self.generation == 0
    }

    pub fn source(&self) -> &EnvironmentSource {
        &self.source
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_background_fallback() {
        let environment = Environment::default();

        assert!(environment.is_fallback());
        assert_eq!(environment.generation(), 0);
        assert_eq!(*environment.source(), EnvironmentSource::Background);
    }

    #[test]
    fn transitions_to_equirect_exactly_once() {
        let mut environment = Environment::default();

        assert!(environment.set_equirect("first.rgbe".to_owned(), 1024, 512));
        assert_eq!(environment.generation(), 1);
        assert!(!environment.is_fallback());

        assert!(!environment.set_equirect("second.rgbe".to_owned(), 2048, 1024));
        assert_eq!(environment.generation(), 1);

        match environment.source() {
            EnvironmentSource::Equirect { pixels, width, height } => {
                assert_eq!(pixels, "first.rgbe");
                assert_eq!(*width, 1024);
                assert_eq!(*height, 512);
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }
}
