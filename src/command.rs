use crate::error::CommandResult;
use crate::model::SolarSystem;
use rand::Rng;

/// A discrete mutation request against the simulation. UI handlers build
/// these instead of touching model or render state directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetSpeedMultiplier { body: String, value: f32 },
    SetRunning(bool),
    TogglePause,
    Reset,
}

/// What an applied command changed, for logging and UI feedback.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    SpeedChanged { body: String, value: f32 },
    Running(bool),
    Reset,
}

impl Command {
    pub fn apply<R: Rng + ?Sized>(
        self,
        sys: &mut SolarSystem,
        rng: &mut R,
    ) -> CommandResult<Outcome> {
        match self {
            Command::SetSpeedMultiplier { body, value } => {
                sys.set_speed_multiplier(&body, value)?;
                Ok(Outcome::SpeedChanged { body, value })
            }
            Command::SetRunning(running) => {
                sys.set_running(running);
                Ok(Outcome::Running(running))
            }
            Command::TogglePause => Ok(Outcome::Running(sys.toggle_pause())),
            Command::Reset => {
                sys.reset(rng);
                Ok(Outcome::Reset)
            }
        }
    }
}
