use crate::config::SceneConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

/// Smallest frame step the scene clock still advances by over a long session.
pub const MIN_FRAME_STEP: f32 = 1.0e-4;
pub const MAX_FRAME_STEP: f32 = 1.0;
pub const MAX_TAIL: f32 = 3600.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub scenario: Option<PathBuf>,
    photos: Option<u32>,
    particles: Option<u32>,
    seed: Option<u64>,
    pub dt: Option<f32>,
    pub tail: Option<f32>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Flags take the form --name value.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config = Some(PathBuf::from(value)),
                "scenario" => overrides.scenario = Some(PathBuf::from(value)),
                "photos" => {
                    overrides.photos =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid photo count '{value}'"))?);
                }
                "particles" => {
                    overrides.particles = Some(
                        value.parse::<u32>().with_context(|| format!("Invalid particle count '{value}'"))?,
                    );
                }
                "seed" => {
                    overrides.seed =
                        Some(value.parse::<u64>().with_context(|| format!("Invalid seed '{value}'"))?);
                }
                "dt" => overrides.dt = Some(parse_seconds("dt", &value, MIN_FRAME_STEP, MAX_FRAME_STEP)?),
                "tail" => overrides.tail = Some(parse_seconds("tail", &value, 0.0, MAX_TAIL)?),
                _ => bail!(
                    "Unknown flag '{flag}'. Supported flags: --config, --scenario, --photos, --particles, \
                     --seed, --dt, --tail."
                ),
            }
        }
        Ok(overrides)
    }

    pub fn config_overrides(&self) -> SceneConfigOverrides {
        SceneConfigOverrides { photo_count: self.photos, particle_count: self.particles, seed: self.seed }
    }
}

fn parse_seconds(flag: &str, value: &str, min: f32, max: f32) -> Result<f32> {
    let seconds = value.parse::<f32>().with_context(|| format!("Invalid {flag} '{value}'"))?;
    if !seconds.is_finite() || seconds < min || seconds > max {
        bail!("Invalid {flag} '{value}'. Expected seconds between {min} and {max}.");
    }
    Ok(seconds)
}
