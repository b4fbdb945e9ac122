use super::error::CertificateError;
use super::layout::DrawCommand;

/// Something draw commands can be replayed onto.
///
/// A surface is owned by exactly one render call: it is acquired, drawn to
/// and then either finished into file bytes or dropped.
pub trait Surface {
    fn draw(&mut self, command: &DrawCommand) -> Result<(), CertificateError>;

    /// Finalize the surface into the bytes of the output file
    fn finish(self) -> Result<Vec<u8>, CertificateError>;
}

/// Hands out a fresh surface per render.
pub trait SurfaceProvider {
    type Surface: Surface;

    fn acquire(&self, width: u32, height: u32) -> Result<Self::Surface, CertificateError>;

    /// File extension of what `Surface::finish` produces
    fn extension(&self) -> &'static str;
}

pub fn replay<S: Surface>(surface: &mut S, commands: &[DrawCommand]) -> Result<(), CertificateError> {
    for command in commands {
        surface.draw(command)?;
    }
    Ok(())
}

/// Surface that only records what it was asked to draw.
///
/// Finishing yields the command list as text, one command per line.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, command: &DrawCommand) -> Result<(), CertificateError> {
        self.commands.push(command.clone());
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, CertificateError> {
        let mut out = format!("canvas {}x{}\n", self.width, self.height);
        for command in &self.commands {
            out.push_str(&command.describe());
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

/// Provider for dry runs: certificates come out as a plain-text draw plan.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordingProvider;

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn acquire(&self, width: u32, height: u32) -> Result<RecordingSurface, CertificateError> {
        Ok(RecordingSurface::new(width, height))
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
