use bytes::Bytes;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

/// A source document as uploaded. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub media_type: MediaType,
    data: Bytes,
    page_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Image,
    Pdf,
}

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

impl MediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            m if m.starts_with("image/") => Some(Self::Image),
            _ => None,
        }
    }

    pub fn from_extension(filename: &str) -> Option<Self> {
        let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        if extension == "pdf" {
            return Some(Self::Pdf);
        }
        IMAGE_EXTENSIONS
            .contains(&extension.as_str())
            .then_some(Self::Image)
    }

    /// Guesses the media type from leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"%PDF-") {
            return Some(Self::Pdf);
        }

        const IMAGE_MAGIC: [&[u8]; 7] = [
            b"\x89PNG\r\n\x1a\n",
            b"\xff\xd8\xff",
            b"GIF87a",
            b"GIF89a",
            b"BM",
            b"II*\x00",
            b"MM\x00*",
        ];

        IMAGE_MAGIC
            .iter()
            .any(|magic| data.starts_with(magic))
            .then_some(Self::Image)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
        }
    }
}

impl Document {
    pub fn new(filename: impl Into<String>, media_type: MediaType, data: impl Into<Bytes>) -> Self {
        let page_count = match media_type {
            MediaType::Image => Some(1),
            MediaType::Pdf => None,
        };
        Self {
            id: DocumentId::new(),
            filename: filename.into(),
            media_type,
            data: data.into(),
            page_count,
        }
    }

    /// Declares the page count of a PDF up front. Images always have one page.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        if self.media_type == MediaType::Pdf {
            self.page_count = Some(page_count);
        }
        self
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }
}
