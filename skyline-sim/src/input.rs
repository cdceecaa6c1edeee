//! Scripted operator input

use skyline_core::{ControlInput, ControlSample};

use crate::config::ScriptStep;

/// Replays a time-ordered script as operator input
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    next: usize,
    now_ms: u32,
    current: ControlSample,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>, brightness: u8) -> Self {
        Self {
            steps,
            next: 0,
            now_ms: 0,
            current: ControlSample {
                level: 0,
                brightness,
                click: None,
            },
        }
    }

    /// Move the script clock forward
    pub fn advance_to(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }
}

impl ControlInput for ScriptedInput {
    fn sample(&mut self) -> ControlSample {
        while let Some(step) = self.steps.get(self.next) {
            if step.at_ms > self.now_ms {
                break;
            }
            if let Some(level) = step.level {
                self.current.level = level;
            }
            if let Some(brightness) = step.brightness {
                self.current.brightness = brightness;
            }
            if let Some(click) = step.click {
                // Only the latest gesture survives between two samples
                self.current.click = Some(click.into());
            }
            self.next += 1;
        }
        let sample = self.current;
        self.current.click = None;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Gesture;
    use skyline_core::ClickGesture;

    fn step(at_ms: u32, click: Option<Gesture>, level: Option<u16>) -> ScriptStep {
        ScriptStep {
            at_ms,
            level,
            brightness: None,
            click,
        }
    }

    #[test]
    fn test_clicks_are_consumed() {
        let mut input = ScriptedInput::new(vec![step(10, Some(Gesture::Single), None)], 4);
        assert_eq!(input.sample().click, None);

        input.advance_to(10);
        assert_eq!(input.sample().click, Some(ClickGesture::Single));
        assert_eq!(input.sample().click, None);
    }

    #[test]
    fn test_levels_persist() {
        let mut input = ScriptedInput::new(
            vec![step(0, None, Some(300)), step(50, None, Some(20))],
            7,
        );
        let sample = input.sample();
        assert_eq!(sample.level, 300);
        assert_eq!(sample.brightness, 7);

        input.advance_to(49);
        assert_eq!(input.sample().level, 300);
        input.advance_to(60);
        assert_eq!(input.sample().level, 20);
    }
}
