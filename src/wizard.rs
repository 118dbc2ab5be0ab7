//! The four-step upload → enhance → generate → result flow.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Upload = 1,
    Enhance = 2,
    Generate = 3,
    Result = 4,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload",
            WizardStep::Enhance => "Enhance",
            WizardStep::Generate => "Generate UGC",
            WizardStep::Result => "Download",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("cannot {action} while at step {current}")]
    OutOfOrder { action: &'static str, current: WizardStep },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    step: WizardStep,
    uploaded_image: Option<String>,
    enhanced_image: Option<String>,
    detected_items: Vec<String>,
    generated_video: Option<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Upload,
            uploaded_image: None,
            enhanced_image: None,
            detected_items: Vec::new(),
            generated_video: None,
        }
    }

    pub fn step(&self) -> WizardStep { self.step }
    pub fn uploaded_image(&self) -> Option<&str> { self.uploaded_image.as_deref() }
    pub fn enhanced_image(&self) -> Option<&str> { self.enhanced_image.as_deref() }
    pub fn detected_items(&self) -> &[String] { &self.detected_items }
    pub fn generated_video(&self) -> Option<&str> { self.generated_video.as_deref() }

    fn expect(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::OutOfOrder { action, current: self.step })
        }
    }

    pub fn image_uploaded(&mut self, image: String) -> Result<(), WizardError> {
        self.expect(WizardStep::Upload, "upload an image")?;
        self.uploaded_image = Some(image);
        self.step = WizardStep::Enhance;
        Ok(())
    }

    pub fn image_enhanced(&mut self, image: String, items: Vec<String>) -> Result<(), WizardError> {
        self.expect(WizardStep::Enhance, "accept an enhanced image")?;
        self.enhanced_image = Some(image);
        self.detected_items = items;
        self.step = WizardStep::Generate;
        Ok(())
    }

    pub fn video_generated(&mut self, video_url: String) -> Result<(), WizardError> {
        self.expect(WizardStep::Generate, "accept a generated video")?;
        self.generated_video = Some(video_url);
        self.step = WizardStep::Result;
        Ok(())
    }

    /// Back to step 1 with everything cleared.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
