//! Cairo-backed graphics engine.

use std::io::Cursor;
use std::sync::Arc;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use super::fetch::{self, HttpImageSource, ImageLocation, ImageSource};
use super::types::{
    BackgroundPlacement, CanvasSpec, CorsMode, EngineError, ImageHandle, ObjectId, RasterFormat,
};
use super::{GraphicsEngine, ImageFuture};
use crate::draw::{self, Shape};

/// Largest width or height Cairo accepts for an image surface.
const MAX_SURFACE_SIDE: u32 = 32767;

/// Graphics engine drawing into in-memory ARGB32 Cairo surfaces.
#[derive(Clone)]
pub struct CairoEngine {
    source: Arc<dyn ImageSource>,
}

struct PlacedBackground {
    surface: cairo::ImageSurface,
    placement: BackgroundPlacement,
}

/// Canvas state owned by the caller of [`CairoEngine`].
pub struct CairoCanvas {
    spec: CanvasSpec,
    surface: cairo::ImageSurface,
    background: Option<PlacedBackground>,
    objects: Vec<(ObjectId, Shape)>,
    next_object: u64,
    active: Option<ObjectId>,
    tainted: bool,
}

impl CairoCanvas {
    pub fn width(&self) -> u32 {
        self.spec.width
    }

    pub fn height(&self) -> u32 {
        self.spec.height
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn is_tainted(&self) -> bool {
        self.tainted
    }
}

impl CairoEngine {
    /// Creates an engine that loads images through `source`.
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source }
    }

    /// Creates an engine loading images over HTTP(S) and from local files.
    pub fn with_http(source: HttpImageSource) -> Self {
        Self::new(Arc::new(source))
    }
}

impl GraphicsEngine for CairoEngine {
    type Canvas = CairoCanvas;

    fn create_canvas(&self, spec: &CanvasSpec) -> Result<CairoCanvas, EngineError> {
        let width = i32::try_from(spec.width)
            .map_err(|_| EngineError::Unavailable(format!("canvas width {} too large", spec.width)))?;
        let height = i32::try_from(spec.height).map_err(|_| {
            EngineError::Unavailable(format!("canvas height {} too large", spec.height))
        })?;
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .map_err(|e| EngineError::Unavailable(format!("cairo surface: {}", e)))?;

        let mut canvas = CairoCanvas {
            spec: *spec,
            surface,
            background: None,
            objects: Vec::new(),
            next_object: 1,
            active: None,
            tainted: false,
        };
        self.render(&mut canvas)?;
        log::debug!("Created {}x{} Cairo canvas", spec.width, spec.height);
        Ok(canvas)
    }

    fn load_image(&self, url: &str, cors: CorsMode) -> ImageFuture {
        let source = Arc::clone(&self.source);
        let url = url.to_string();
        Box::pin(async move {
            let location = ImageLocation::parse(&url)?;
            let fetched = source.fetch(&location, cors).await?;
            let origin_clean = fetched.origin_clean;

            // Decoding large photos is CPU bound; keep it off the executor
            let decoded = tokio::task::spawn_blocking(move || fetch::decode_image(&fetched.bytes))
                .await
                .map_err(|e| EngineError::image_load(&url, format!("decode task failed: {}", e)))?
                .map_err(|e| EngineError::image_load(&url, e))?;

            let (width, height, pixels) = decoded;
            log::debug!("Decoded {} ({}x{})", url, width, height);
            ImageHandle::from_rgba(width, height, pixels, origin_clean)
        })
    }

    fn set_background(
        &self,
        canvas: &mut CairoCanvas,
        image: &ImageHandle,
        placement: BackgroundPlacement,
    ) -> Result<(), EngineError> {
        let surface = image_surface(image)?;
        if !image.origin_clean() {
            canvas.tainted = true;
        }
        canvas.background = Some(PlacedBackground { surface, placement });
        Ok(())
    }

    fn add_object(&self, canvas: &mut CairoCanvas, shape: &Shape) -> Result<ObjectId, EngineError> {
        let id = ObjectId(canvas.next_object);
        canvas.next_object += 1;
        canvas.objects.push((id, shape.clone()));
        Ok(id)
    }

    fn set_active_object(
        &self,
        canvas: &mut CairoCanvas,
        object: ObjectId,
    ) -> Result<(), EngineError> {
        if !canvas.objects.iter().any(|(id, _)| *id == object) {
            return Err(EngineError::UnknownObject(object));
        }
        canvas.active = Some(object);
        Ok(())
    }

    fn render(&self, canvas: &mut CairoCanvas) -> Result<(), EngineError> {
        {
            let ctx = cairo::Context::new(&canvas.surface)?;
            draw::render_canvas_color(&ctx, canvas.spec.background_color);
            if let Some(background) = &canvas.background {
                draw::render_background_image(
                    &ctx,
                    &background.surface,
                    background.placement.scale,
                )?;
            }
            draw::render_shapes(&ctx, canvas.objects.iter().map(|(_, shape)| shape));
            ctx.status()?;
        }
        canvas.surface.flush();
        Ok(())
    }

    fn to_raster_bytes(
        &self,
        canvas: &mut CairoCanvas,
        format: RasterFormat,
        quality: f64,
    ) -> Result<Vec<u8>, EngineError> {
        if canvas.tainted {
            return Err(EngineError::Tainted);
        }
        self.render(canvas)?;

        match format {
            RasterFormat::Png => {
                let mut buffer = Vec::new();
                canvas
                    .surface
                    .write_to_png(&mut buffer)
                    .map_err(|e| EngineError::Encode(e.to_string()))?;
                Ok(buffer)
            }
            RasterFormat::Jpeg => encode_jpeg(&mut canvas.surface, quality),
        }
    }

    fn dispose(&self, canvas: CairoCanvas) {
        log::debug!(
            "Disposing {}x{} canvas with {} objects",
            canvas.spec.width,
            canvas.spec.height,
            canvas.objects.len()
        );
        canvas.surface.finish();
    }
}

/// Converts straight RGBA8 into a premultiplied ARGB32 Cairo surface.
fn image_surface(image: &ImageHandle) -> Result<cairo::ImageSurface, EngineError> {
    if image.width() > MAX_SURFACE_SIDE || image.height() > MAX_SURFACE_SIDE {
        return Err(EngineError::Render(format!(
            "image {}x{} exceeds the {} px surface limit",
            image.width(),
            image.height(),
            MAX_SURFACE_SIDE
        )));
    }
    let width = image.width() as i32;
    let height = image.height() as i32;
    let stride = cairo::Format::ARgb32.stride_for_width(image.width())?;

    let row_bytes = image.width() as usize * 4;
    let mut data = vec![0u8; stride as usize * image.height() as usize];
    if row_bytes > 0 {
        for (src_row, dst_row) in image
            .pixels()
            .chunks_exact(row_bytes)
            .zip(data.chunks_exact_mut(stride as usize))
        {
            for (src, dst) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                let alpha = src[3] as u32;
                let premultiply = |c: u8| (c as u32 * alpha + 127) / 255;
                let word = (alpha << 24)
                    | (premultiply(src[0]) << 16)
                    | (premultiply(src[1]) << 8)
                    | premultiply(src[2]);
                dst.copy_from_slice(&word.to_ne_bytes());
            }
        }
    }

    Ok(cairo::ImageSurface::create_for_data(
        data,
        cairo::Format::ARgb32,
        width,
        height,
        stride,
    )?)
}

/// Flattens the surface to RGB and encodes it as JPEG.
fn encode_jpeg(surface: &mut cairo::ImageSurface, quality: f64) -> Result<Vec<u8>, EngineError> {
    let width = surface.width() as u32;
    let height = surface.height() as u32;
    let stride = surface.stride() as usize;
    let data = surface
        .data()
        .map_err(|e| EngineError::Encode(format!("surface data: {}", e)))?;

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for row in data.chunks_exact(stride).take(height as usize) {
        for px in row.chunks_exact(4).take(width as usize) {
            let word = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
            let alpha = word >> 24;
            let unpremultiply = |c: u32| {
                if alpha == 0 {
                    0
                } else {
                    ((c * 255 + alpha / 2) / alpha).min(255) as u8
                }
            };
            rgb.push(unpremultiply((word >> 16) & 0xff));
            rgb.push(unpremultiply((word >> 8) & 0xff));
            rgb.push(unpremultiply(word & 0xff));
        }
    }
    drop(data);

    let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EngineError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{FontDescriptor, BLACK, WHITE};
    use crate::engine::fetch::FetchedImage;
    use async_trait::async_trait;

    const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    /// Serves a fixed in-memory PNG for every location.
    struct StaticSource {
        bytes: Vec<u8>,
        origin_clean: bool,
    }

    #[async_trait]
    impl ImageSource for StaticSource {
        async fn fetch(
            &self,
            _location: &ImageLocation,
            _cors: CorsMode,
        ) -> Result<FetchedImage, EngineError> {
            Ok(FetchedImage {
                bytes: self.bytes.clone(),
                origin_clean: self.origin_clean,
            })
        }
    }

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn engine_serving(bytes: Vec<u8>, origin_clean: bool) -> CairoEngine {
        CairoEngine::new(Arc::new(StaticSource {
            bytes,
            origin_clean,
        }))
    }

    fn spec() -> CanvasSpec {
        CanvasSpec {
            width: 80,
            height: 60,
            background_color: WHITE,
        }
    }

    fn decode(bytes: &[u8]) -> image::RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    #[test]
    fn fresh_canvas_exports_white_png() {
        let engine = engine_serving(Vec::new(), true);
        let mut canvas = engine.create_canvas(&spec()).unwrap();
        let bytes = engine
            .to_raster_bytes(&mut canvas, RasterFormat::Png, 1.0)
            .unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);

        let decoded = decode(&bytes);
        assert_eq!(decoded.dimensions(), (80, 60));
        assert_eq!(decoded.get_pixel(40, 30).0, [255, 255, 255, 255]);
        engine.dispose(canvas);
    }

    #[test]
    fn objects_are_tracked_and_activated() {
        let engine = engine_serving(Vec::new(), true);
        let mut canvas = engine.create_canvas(&spec()).unwrap();
        let first = engine
            .add_object(&mut canvas, &Shape::default_rectangle())
            .unwrap();
        let second = engine
            .add_object(
                &mut canvas,
                &Shape::text("hey", 12.0, FontDescriptor::default(), BLACK),
            )
            .unwrap();
        assert_ne!(first, second);

        engine.set_active_object(&mut canvas, second).unwrap();
        assert_eq!(canvas.active_object(), Some(second));
        assert_eq!(canvas.object_count(), 2);

        let err = engine
            .set_active_object(&mut canvas, ObjectId(999))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownObject(ObjectId(999))));
    }

    #[tokio::test]
    async fn background_image_is_scaled_from_origin() {
        // 40x20 opaque red image scaled by 2 covers the canvas top 40 rows
        let engine = engine_serving(png_bytes(40, 20, [255, 0, 0, 255]), true);
        let image = engine
            .load_image("bg.png", CorsMode::Anonymous)
            .await
            .unwrap();
        assert_eq!((image.width(), image.height()), (40, 20));

        let mut canvas = engine.create_canvas(&spec()).unwrap();
        engine
            .set_background(
                &mut canvas,
                &image,
                BackgroundPlacement {
                    scale: 2.0,
                    selectable: false,
                },
            )
            .unwrap();
        assert!(canvas.has_background());

        let bytes = engine
            .to_raster_bytes(&mut canvas, RasterFormat::Png, 1.0)
            .unwrap();
        let decoded = decode(&bytes);
        assert_eq!(decoded.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(70, 35).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(40, 50).0, [255, 255, 255, 255]);
    }

    #[tokio::test]
    async fn tainted_background_blocks_export() {
        let engine = engine_serving(png_bytes(4, 4, [0, 0, 255, 255]), false);
        let image = engine
            .load_image("https://cdn.test/a.png", CorsMode::NoCors)
            .await
            .unwrap();
        assert!(!image.origin_clean());

        let mut canvas = engine.create_canvas(&spec()).unwrap();
        engine
            .set_background(
                &mut canvas,
                &image,
                BackgroundPlacement {
                    scale: 1.0,
                    selectable: false,
                },
            )
            .unwrap();
        assert!(canvas.is_tainted());

        let err = engine
            .to_raster_bytes(&mut canvas, RasterFormat::Png, 1.0)
            .unwrap_err();
        assert!(matches!(err, EngineError::Tainted));
    }

    #[tokio::test]
    async fn undecodable_image_reports_load_error() {
        let engine = engine_serving(b"garbage".to_vec(), true);
        let err = engine
            .load_image("broken.png", CorsMode::Anonymous)
            .await
            .unwrap_err();
        match err {
            EngineError::ImageLoad { url, .. } => assert_eq!(url, "broken.png"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn shapes_are_flattened_over_background_color() {
        let engine = engine_serving(Vec::new(), true);
        let mut canvas = engine.create_canvas(&spec()).unwrap();
        engine
            .add_object(
                &mut canvas,
                &Shape::Rect {
                    left: 0.0,
                    top: 0.0,
                    width: 20.0,
                    height: 20.0,
                    fill: BLACK,
                },
            )
            .unwrap();
        let bytes = engine
            .to_raster_bytes(&mut canvas, RasterFormat::Png, 1.0)
            .unwrap();
        let decoded = decode(&bytes);
        assert_eq!(decoded.get_pixel(5, 5).0, [0, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(50, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn jpeg_export_produces_jpeg_stream() {
        let engine = engine_serving(Vec::new(), true);
        let mut canvas = engine.create_canvas(&spec()).unwrap();
        let bytes = engine
            .to_raster_bytes(&mut canvas, RasterFormat::Jpeg, 0.8)
            .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(decode(&bytes).dimensions(), (80, 60));
    }

    #[test]
    fn oversized_background_is_rejected_before_allocation() {
        let engine = engine_serving(Vec::new(), true);
        let mut canvas = engine.create_canvas(&spec()).unwrap();
        let image = ImageHandle::from_rgba(40000, 1, vec![0; 40000 * 4], true).unwrap();

        let err = engine
            .set_background(
                &mut canvas,
                &image,
                BackgroundPlacement {
                    scale: 0.02,
                    selectable: false,
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Render(ref reason) if reason.contains("32767")));
        assert!(canvas.background.is_none());
    }

    #[test]
    fn premultiplies_translucent_pixels() {
        let image = ImageHandle::from_rgba(1, 1, vec![255, 0, 0, 128], true).unwrap();
        let mut surface = image_surface(&image).unwrap();
        let data = surface.data().unwrap();
        let word = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
        assert_eq!(word >> 24, 128);
        assert_eq!((word >> 16) & 0xff, 128);
        assert_eq!(word & 0xffff, 0);
    }
}
