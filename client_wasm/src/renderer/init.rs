use web_sys::HtmlCanvasElement;
use wgpu::*;

use super::RenderError;

pub struct WgpuContext {
    pub device: Device,
    pub queue: Queue,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
}

/// WebGPU device and a surface on `canvas`, configured at the canvas' size
pub async fn init_wgpu(canvas: HtmlCanvasElement) -> Result<WgpuContext, RenderError> {
    let (width, height) = (canvas.width().max(1), canvas.height().max(1));

    let instance = Instance::new(&InstanceDescriptor {
        backends: Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let surface = instance
        .create_surface(SurfaceTarget::Canvas(canvas))
        .map_err(|e| RenderError::Init(format!("surface: {}", e)))?;

    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        })
        .await
        .ok_or_else(|| RenderError::Init("no WebGPU adapter".to_string()))?;

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some("Pong Device"),
                required_limits: Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
                ..Default::default()
            },
            None,
        )
        .await
        .map_err(|e| RenderError::Init(format!("device: {}", e)))?;

    let mut config = surface
        .get_default_config(&adapter, width, height)
        .ok_or_else(|| RenderError::Init("surface not supported by adapter".to_string()))?;
    // Prefer an sRGB format so tints read as authored
    if let Some(srgb) = surface
        .get_capabilities(&adapter)
        .formats
        .into_iter()
        .find(|f| f.is_srgb())
    {
        config.format = srgb;
    }
    config.present_mode = PresentMode::Fifo;
    surface.configure(&device, &config);
    tracing::info!(format = ?config.format, width, height, "WebGPU surface ready");

    Ok(WgpuContext {
        device,
        queue,
        surface,
        config,
    })
}
