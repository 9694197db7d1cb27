//! Image XObject enumeration.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::ocr::{ImageData, ImageFormat};

/// Collect the image XObjects referenced by a page's resources, sorted by
/// resource name so repeated runs see the same order.
pub(crate) fn page_images(doc: &LopdfDocument, page_id: ObjectId) -> Vec<ImageData> {
    let Some(xobjects) = page_xobjects(doc, page_id) else {
        return Vec::new();
    };

    let mut images: Vec<ImageData> = xobjects
        .iter()
        .filter_map(|(name, obj)| {
            let stream = resolve(doc, obj).and_then(|o| o.as_stream().ok())?;
            image_from_stream(&String::from_utf8_lossy(name), stream)
        })
        .collect();
    images.sort_by(|a, b| a.name.cmp(&b.name));
    images
}

fn page_xobjects(doc: &LopdfDocument, page_id: ObjectId) -> Option<&Dictionary> {
    let page = doc.get_dictionary(page_id).ok()?;
    let resources = resolve(doc, page.get(b"Resources").ok()?)?.as_dict().ok()?;
    resolve(doc, resources.get(b"XObject").ok()?)?.as_dict().ok()
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn image_from_stream(name: &str, stream: &Stream) -> Option<ImageData> {
    let dict = &stream.dict;
    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    // The last filter in a chain decides the payload encoding.
    let filter = match dict.get(b"Filter").ok() {
        Some(Object::Name(n)) => Some(n.clone()),
        Some(Object::Array(arr)) => arr.last().and_then(|o| o.as_name().ok()).map(|n| n.to_vec()),
        _ => None,
    };

    let (format, data) = match filter.as_deref() {
        Some(b"DCTDecode") => (ImageFormat::Jpeg, stream.content.clone()),
        Some(b"JPXDecode") => (ImageFormat::Jpeg2000, stream.content.clone()),
        _ => (
            ImageFormat::Raw,
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
        ),
    };

    let mut image = ImageData::new(name, data, format);
    let dimension = |key: &[u8]| {
        dict.get(key)
            .ok()
            .and_then(|v| v.as_i64().ok())
            .and_then(|v| u32::try_from(v).ok())
    };
    if let (Some(w), Some(h)) = (dimension(b"Width"), dimension(b"Height")) {
        image = image.with_dimensions(w, h);
    }
    Some(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_jpeg_image_kept_verbatim() {
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 640,
                "Height" => 480,
                "Filter" => "DCTDecode",
            },
            vec![0xFF, 0xD8, 0xFF, 0xE0],
        );

        let image = image_from_stream("Im0", &stream).unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.data, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(image.width, Some(640));
        assert_eq!(image.height, Some(480));
    }

    #[test]
    fn test_form_xobject_ignored() {
        let stream = Stream::new(
            dictionary! { "Type" => "XObject", "Subtype" => "Form" },
            Vec::new(),
        );
        assert!(image_from_stream("Fm0", &stream).is_none());
    }

    #[test]
    fn test_unfiltered_image_is_raw() {
        let stream = Stream::new(
            dictionary! { "Subtype" => "Image", "Width" => 2, "Height" => 1 },
            vec![0, 255],
        );
        let image = image_from_stream("Im1", &stream).unwrap();
        assert_eq!(image.format, ImageFormat::Raw);
    }
}
