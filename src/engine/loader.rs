use std::fmt;
use std::path::Path;

use crate::error::SkyscapeError;
use crate::options::ImageSource;

/// Errors raised while loading an image.
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be read.
    Io(std::io::Error),
    /// The bytes are not a supported image.
    Decode(image::ImageError),
    /// A network request failed or returned a non-success status.
    Fetch(String),
    /// The loader went away before the request finished.
    Cancelled,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "read failed: {e}"),
            Self::Decode(e) => write!(f, "decode failed: {e}"),
            Self::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            Self::Cancelled => write!(f, "load cancelled"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Fetch(_) | Self::Cancelled => None,
        }
    }
}

/// An image decoded to tightly packed RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major, top row first.
    pub rgba: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl DecodedImage {
    /// Decode PNG or JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] for unsupported or corrupt data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(LoadError::Decode)?
            .to_rgba8();
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            rgba: decoded.into_raw(),
        })
    }

    /// Read and decode an image file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Decode`].
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(LoadError::Io)?;
        Self::from_bytes(&bytes)
    }

    /// Solid-colour image, mostly useful as a placeholder.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rgba: rgba.repeat((width * height) as usize),
        }
    }

    /// Rotate 180° in-plane (mirror both horizontally and vertically).
    pub fn rotate_180(&mut self) {
        let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut self.rgba);
        pixels.reverse();
    }
}

/// Cube face in GPU layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// +X
    PositiveX,
    /// −X
    NegativeX,
    /// +Y
    PositiveY,
    /// −Y
    NegativeY,
    /// +Z
    PositiveZ,
    /// −Z
    NegativeZ,
}

impl CubeFace {
    /// All faces in GPU layer order.
    pub const ALL: [Self; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// Conventional short name (`px`, `nx`, ...).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PositiveX => "px",
            Self::NegativeX => "nx",
            Self::PositiveY => "py",
            Self::NegativeY => "ny",
            Self::PositiveZ => "pz",
            Self::NegativeZ => "nz",
        }
    }

    /// Array layer of this face in a cube texture.
    #[must_use]
    pub fn layer(self) -> usize {
        self as usize
    }
}

/// The six image sources of a cubemap, named by face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeFaces {
    /// +X face.
    pub px: ImageSource,
    /// −X face.
    pub nx: ImageSource,
    /// +Y face (shown rotated 180°, see [`CubeImages::from_faces`]).
    pub py: ImageSource,
    /// −Y face.
    pub ny: ImageSource,
    /// +Z face.
    pub pz: ImageSource,
    /// −Z face.
    pub nz: ImageSource,
}

impl CubeFaces {
    /// Faces named `px.<ext>`, `nx.<ext>`, ... inside `dir`.
    #[must_use]
    pub fn from_directory(dir: &Path, extension: &str) -> Self {
        let face = |f: CubeFace| {
            ImageSource(
                dir.join(format!("{}.{extension}", f.name()))
                    .to_string_lossy()
                    .into_owned(),
            )
        };
        Self {
            px: face(CubeFace::PositiveX),
            nx: face(CubeFace::NegativeX),
            py: face(CubeFace::PositiveY),
            ny: face(CubeFace::NegativeY),
            pz: face(CubeFace::PositiveZ),
            nz: face(CubeFace::NegativeZ),
        }
    }

    /// Source for one face.
    #[must_use]
    pub fn get(&self, face: CubeFace) -> &ImageSource {
        match face {
            CubeFace::PositiveX => &self.px,
            CubeFace::NegativeX => &self.nx,
            CubeFace::PositiveY => &self.py,
            CubeFace::NegativeY => &self.ny,
            CubeFace::PositiveZ => &self.pz,
            CubeFace::NegativeZ => &self.nz,
        }
    }

    /// Sources in GPU layer order.
    #[must_use]
    pub fn in_layer_order(&self) -> Vec<ImageSource> {
        CubeFace::ALL.iter().map(|&f| self.get(f).clone()).collect()
    }
}

/// Six decoded, validated cube faces in layer order.
#[derive(Debug, Clone)]
pub struct CubeImages {
    faces: Vec<DecodedImage>,
}

impl CubeImages {
    /// Validate six loaded faces (square, equal size, in layer order) and
    /// rotate the +Y face 180° so it lines up with its neighbours in the
    /// skybox's face convention.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError::InvalidCubemap`] on a wrong face count or
    /// mismatched dimensions.
    pub fn from_faces(faces: Vec<DecodedImage>) -> Result<Self, SkyscapeError> {
        if faces.len() != CubeFace::ALL.len() {
            return Err(SkyscapeError::InvalidCubemap(format!(
                "expected 6 faces, got {}",
                faces.len()
            )));
        }
        let size = faces[0].width;
        for (face, image) in CubeFace::ALL.iter().zip(&faces) {
            if image.width != size || image.height != size || size == 0 {
                return Err(SkyscapeError::InvalidCubemap(format!(
                    "face {} is {}x{}, expected {size}x{size}",
                    face.name(),
                    image.width,
                    image.height
                )));
            }
        }
        let mut images = Self { faces };
        images.faces[CubeFace::PositiveY.layer()].rotate_180();
        Ok(images)
    }

    /// Edge length of every face.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.faces[0].width
    }

    /// One face.
    #[must_use]
    pub fn face(&self, face: CubeFace) -> &DecodedImage {
        &self.faces[face.layer()]
    }

    /// Faces in layer order.
    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &DecodedImage)> {
        CubeFace::ALL.into_iter().zip(&self.faces)
    }
}

/// Completion callback of an [`ImageLoader`] request. Images arrive in
/// the order their sources were given.
pub type LoadCallback = Box<dyn FnOnce(Result<Vec<DecodedImage>, LoadError>)>;

/// Asynchronous image loading.
///
/// Implementations must never invoke the callback from inside
/// [`load`](Self::load): completion always happens later, on the thread
/// that owns the loader.
pub trait ImageLoader {
    /// Start loading `sources`; `on_done` receives every image or the
    /// first error.
    fn load(&self, sources: Vec<ImageSource>, on_done: LoadCallback);

    /// Deliver finished loads. Loaders driven by the host event loop do
    /// nothing here. Returns the number of callbacks run.
    fn pump(&self) -> usize {
        0
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use threaded::ThreadedImageLoader;

#[cfg(not(target_arch = "wasm32"))]
mod threaded {
    use std::cell::{Cell, RefCell};
    use std::path::PathBuf;
    use std::sync::mpsc::{channel, Receiver, Sender};

    use rustc_hash::FxHashMap;

    use super::{DecodedImage, ImageLoader, LoadCallback, LoadError};
    use crate::options::ImageSource;

    type Completion = (u64, Result<Vec<DecodedImage>, LoadError>);

    /// Loads image files on worker threads.
    ///
    /// Decoding runs off-thread; callbacks are kept on the owning thread
    /// and run from [`pump`](ImageLoader::pump).
    pub struct ThreadedImageLoader {
        base_dir: Option<PathBuf>,
        next_request: Cell<u64>,
        pending: RefCell<FxHashMap<u64, LoadCallback>>,
        tx: Sender<Completion>,
        rx: Receiver<Completion>,
    }

    impl Default for ThreadedImageLoader {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ThreadedImageLoader {
        /// Loader resolving sources as paths relative to the working
        /// directory.
        #[must_use]
        pub fn new() -> Self {
            let (tx, rx) = channel();
            Self {
                base_dir: None,
                next_request: Cell::new(0),
                pending: RefCell::new(FxHashMap::default()),
                tx,
                rx,
            }
        }

        /// Resolve relative sources against `dir`.
        #[must_use]
        pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
            self.base_dir = Some(dir.into());
            self
        }

        /// Requests not yet delivered.
        #[must_use]
        pub fn in_flight(&self) -> usize {
            self.pending.borrow().len()
        }

        /// Block until every request issued so far has completed, then
        /// deliver them.
        pub fn wait_all(&self) -> usize {
            let mut delivered = 0;
            while self.in_flight() > 0 {
                match self.rx.recv() {
                    Ok(completion) => {
                        self.deliver(completion);
                        delivered += 1;
                    }
                    Err(_) => break,
                }
            }
            delivered
        }

        fn resolve(&self, source: &ImageSource) -> PathBuf {
            match &self.base_dir {
                Some(dir) => dir.join(source.as_str()),
                None => PathBuf::from(source.as_str()),
            }
        }

        fn deliver(&self, (id, result): Completion) {
            let callback = self.pending.borrow_mut().remove(&id);
            match callback {
                Some(callback) => callback(result),
                None => log::warn!("image load {id} finished with no callback"),
            }
        }
    }

    impl ImageLoader for ThreadedImageLoader {
        fn load(&self, sources: Vec<ImageSource>, on_done: LoadCallback) {
            let id = self.next_request.get();
            self.next_request.set(id + 1);
            let _ = self.pending.borrow_mut().insert(id, on_done);

            let paths: Vec<PathBuf> =
                sources.iter().map(|s| self.resolve(s)).collect();
            log::debug!("loading {} image(s), request {id}", paths.len());

            let tx = self.tx.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("skyscape-image-{id}"))
                .spawn(move || {
                    let result = paths
                        .iter()
                        .map(|p| DecodedImage::from_path(p))
                        .collect::<Result<Vec<_>, _>>();
                    // Receiver gone means the loader was dropped.
                    let _ = tx.send((id, result));
                });
            if let Err(e) = spawned {
                let _ = self.tx.send((id, Err(LoadError::Io(e))));
            }
        }

        fn pump(&self) -> usize {
            let mut delivered = 0;
            while let Ok(completion) = self.rx.try_recv() {
                self.deliver(completion);
                delivered += 1;
            }
            delivered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn rotate_180_reverses_pixels() {
        let mut img = DecodedImage {
            width: 2,
            height: 2,
            rgba: vec![
                1, 1, 1, 1, 2, 2, 2, 2, //
                3, 3, 3, 3, 4, 4, 4, 4,
            ],
        };
        img.rotate_180();
        assert_eq!(
            img.rgba,
            vec![4, 4, 4, 4, 3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1]
        );
    }

    #[test]
    fn decode_png() {
        let img = DecodedImage::from_bytes(&png_bytes(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(&img.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decode_garbage_fails() {
        let err = DecodedImage::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn cube_images_flip_only_positive_y() {
        let mut faces: Vec<DecodedImage> =
            (0..6).map(|_| DecodedImage::solid(2, 2, [0, 0, 0, 255])).collect();
        for face in &mut faces {
            face.rgba[0] = 200;
        }
        let cube = CubeImages::from_faces(faces).unwrap();
        for (face, image) in cube.iter() {
            if face == CubeFace::PositiveY {
                assert_eq!(image.rgba[0], 0);
                assert_eq!(image.rgba[12], 200);
            } else {
                assert_eq!(image.rgba[0], 200);
            }
        }
    }

    #[test]
    fn cube_images_reject_bad_faces() {
        let five = vec![DecodedImage::solid(4, 4, [0; 4]); 5];
        assert!(CubeImages::from_faces(five).is_err());

        let mut faces = vec![DecodedImage::solid(4, 4, [0; 4]); 6];
        faces[3] = DecodedImage::solid(4, 2, [0; 4]);
        let err = CubeImages::from_faces(faces).unwrap_err();
        assert!(err.to_string().contains("ny"));
    }

    #[test]
    fn faces_from_directory_in_layer_order() {
        let faces = CubeFaces::from_directory(Path::new("sky"), "jpg");
        let names: Vec<String> = faces
            .in_layer_order()
            .iter()
            .map(|s| Path::new(s.as_str()).file_stem().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["px", "nx", "py", "ny", "pz", "nz"]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn threaded_loader_delivers_on_pump() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let dir = std::env::temp_dir().join(format!("skyscape-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.png"), png_bytes(2, 2, [1, 2, 3, 255])).unwrap();

        let loader = ThreadedImageLoader::new().with_base_dir(&dir);
        let result = Rc::new(RefCell::new(None));
        let r = Rc::clone(&result);
        loader.load(
            vec![ImageSource::from("a.png"), ImageSource::from("missing.png")],
            Box::new(move |res| *r.borrow_mut() = Some(res.is_ok())),
        );
        let ok = Rc::new(RefCell::new(None));
        let o = Rc::clone(&ok);
        loader.load(
            vec![ImageSource::from("a.png")],
            Box::new(move |res| *o.borrow_mut() = Some(res.map(|v| v.len()).ok())),
        );
        // Nothing runs inside load.
        assert!(result.borrow().is_none());

        assert_eq!(loader.wait_all(), 2);
        assert_eq!(*result.borrow(), Some(false));
        assert_eq!(*ok.borrow(), Some(Some(1)));
        assert_eq!(loader.in_flight(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
