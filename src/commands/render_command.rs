//! Previews and video for the frames of a finished run

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::apply_overrides;
use crate::config::PipelineConfig;
use crate::error::NightResult;
use crate::pipeline::OutputDirectory;
use crate::render::FrameRenderer;
use crate::utils::logger::Logger;

pub struct RenderCommand<'a> {
    config: PipelineConfig,
    video: bool,
    logger: &'a Logger,
}

impl<'a> RenderCommand<'a> {
    pub fn new(args: &ArgMatches, config: &PipelineConfig, logger: &'a Logger) -> NightResult<Self> {
        let mut config = config.clone();
        apply_overrides(&mut config, args);
        let video = args.get_flag("video");
        info!("Render {} (video: {})", config.output.directory.display(), video);

        Ok(RenderCommand { config, video, logger })
    }
}

impl<'a> Command for RenderCommand<'a> {
    fn execute(&self) -> NightResult<()> {
        let output = OutputDirectory::open(&self.config.output.directory)?;
        let renderer = FrameRenderer::new(self.config.render.framerate, self.config.render.ffmpeg.as_str(), self.logger);

        let previews = renderer.write_previews(&output)?;
        println!("Wrote {} previews to {}", previews.len(), output.previews_dir().display());

        if self.video {
            let video = renderer.encode_video(&output)?;
            println!("Video created successfully: {}", video.display());
        }
        Ok(())
    }
}
