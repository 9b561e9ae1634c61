// ABOUTME: PPTX generation module for the finance-deck application
// ABOUTME: Renders resolved slides (title, bullets, one image) into a PowerPoint package

use crate::errors::{DeckError, Result};
use crate::model::{Deck, EmbeddedImage, ImageFormat, ResolvedSlide};
use crate::utils;
use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::io::{Cursor, Seek, Write};
use std::path::PathBuf;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const PLACEHOLDER_MEDIA: &str = "placeholder.png";
const PLACEHOLDER_WIDTH: u32 = 640;
const PLACEHOLDER_HEIGHT: u32 = 360;

const TITLE_COLOR: &str = "1F4E79";
const TEXT_COLOR: &str = "333333";
const CAPTION_COLOR: &str = "808080";

/// Configuration for PPTX generation
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub aspect_ratio: String, // "16:9" or "4:3"
    pub captions: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            captions: true,
        }
    }
}

impl RenderConfig {
    /// Slide size in EMU.
    pub fn slide_size(&self) -> (u64, u64) {
        match self.aspect_ratio.as_str() {
            "16:9" => (12192000, 6858000),
            "4:3" => (9144000, 6858000),
            _ => {
                warn!(
                    "Unsupported aspect ratio: {}. Using 16:9 instead.",
                    self.aspect_ratio
                );
                (12192000, 6858000)
            }
        }
    }
}

/// A rectangle in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u64,
    y: u64,
    cx: u64,
    cy: u64,
}

/// Fit an image of `width` x `height` inside `frame`, centred, keeping its
/// aspect ratio.
fn fit_image(frame: Frame, width: u32, height: u32) -> Frame {
    let (w, h) = (u64::from(width.max(1)), u64::from(height.max(1)));
    let (cx, cy) = if w * frame.cy > h * frame.cx {
        (frame.cx, frame.cx * h / w)
    } else {
        (frame.cy * w / h, frame.cy)
    };
    Frame {
        x: frame.x + (frame.cx - cx) / 2,
        y: frame.y + (frame.cy - cy) / 2,
        cx,
        cy,
    }
}

/// Where a slide's picture lives inside the package.
struct MediaPart<'a> {
    name: String,
    image: &'a EmbeddedImage,
}

/// Writes decks to disk.
pub struct DeckRenderer {
    config: RenderConfig,
}

impl Default for DeckRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl DeckRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render `deck` to `deck.path`. Either the whole file is written or no
    /// file is left at the target path.
    pub fn render(&self, deck: Deck) -> Result<PathBuf> {
        info!(
            "Rendering {} slides to {:?}",
            deck.slides.len(),
            deck.path
        );
        let bytes = self.build_package(&deck)?;

        utils::ensure_parent_directory_exists(&deck.path)?;
        utils::write_atomically(&deck.path, &bytes)?;

        info!("PPTX file created at {:?}", deck.path);
        Ok(deck.path)
    }

    /// Build the complete package in memory.
    pub fn build_package(&self, deck: &Deck) -> Result<Vec<u8>> {
        if deck.slides.is_empty() {
            return Err(DeckError::PptxError("deck has no slides".to_string()));
        }

        let (cx, cy) = self.config.slide_size();

        let placeholder = if deck.slides.iter().any(|s| s.media.is_fallback()) {
            Some(placeholder_image()?)
        } else {
            None
        };

        let mut media_parts = Vec::with_capacity(deck.slides.len());
        for (i, slide) in deck.slides.iter().enumerate() {
            let part = match (slide.media.is_fallback(), slide.media.image(), &placeholder) {
                (true, _, Some(image)) => MediaPart {
                    name: PLACEHOLDER_MEDIA.to_string(),
                    image,
                },
                (false, Some(image), _) => MediaPart {
                    name: format!("image{}.{}", i + 1, image.format.extension()),
                    image,
                },
                _ => {
                    return Err(DeckError::UnsupportedMedia(format!(
                        "slide {} references {} without image data",
                        i + 1,
                        slide.media.source()
                    )))
                }
            };
            media_parts.push(part);
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let xml = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        let stored = xml.compression_method(CompressionMethod::Stored);

        let n = deck.slides.len();
        add_part(&mut zip, "[Content_Types].xml", xml, content_types_xml(n).as_bytes())?;
        add_part(&mut zip, "_rels/.rels", xml, PACKAGE_RELS.as_bytes())?;
        add_part(&mut zip, "docProps/app.xml", xml, app_xml(n).as_bytes())?;
        add_part(&mut zip, "docProps/core.xml", xml, core_xml(&deck.title, &deck.summary).as_bytes())?;
        add_part(&mut zip, "ppt/presentation.xml", xml, presentation_xml(n, cx, cy).as_bytes())?;
        add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            xml,
            presentation_rels_xml(n).as_bytes(),
        )?;
        add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", xml, slide_master_xml().as_bytes())?;
        add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            xml,
            SLIDE_MASTER_RELS.as_bytes(),
        )?;
        add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", xml, slide_layout_xml().as_bytes())?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            xml,
            SLIDE_LAYOUT_RELS.as_bytes(),
        )?;
        add_part(&mut zip, "ppt/theme/theme1.xml", xml, THEME_XML.as_bytes())?;

        let mut placeholder_written = false;
        for (i, (slide, media)) in deck.slides.iter().zip(&media_parts).enumerate() {
            let slide_num = i + 1;
            debug!("Creating slide XML: ppt/slides/slide{}.xml", slide_num);

            if media.name == PLACEHOLDER_MEDIA {
                if !placeholder_written {
                    add_part(&mut zip, "ppt/media/placeholder.png", stored, &media.image.bytes)?;
                    placeholder_written = true;
                }
            } else {
                add_part(
                    &mut zip,
                    &format!("ppt/media/{}", media.name),
                    stored,
                    &media.image.bytes,
                )?;
            }

            add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
                xml,
                slide_rels_xml(&media.name).as_bytes(),
            )?;
            add_part(
                &mut zip,
                &format!("ppt/slides/slide{}.xml", slide_num),
                xml,
                self.slide_xml(slide_num, slide, media.image, cx, cy).as_bytes(),
            )?;
        }

        // Finalize the ZIP file
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn slide_xml(
        &self,
        slide_num: usize,
        slide: &ResolvedSlide,
        image: &EmbeddedImage,
        cx: u64,
        cy: u64,
    ) -> String {
        let margin = cx / 30;
        let title = Frame {
            x: margin,
            y: cy / 24,
            cx: cx - 2 * margin,
            cy: cy * 14 / 100,
        };
        let body = Frame {
            x: margin,
            y: cy / 5,
            cx: cx * 56 / 100,
            cy: cy * 72 / 100,
        };
        let picture_box = Frame {
            x: cx * 62 / 100,
            y: cy * 24 / 100,
            cx: cx * 34 / 100,
            cy: cy / 2,
        };
        let picture = fit_image(picture_box, image.width, image.height);

        let mut shapes = String::new();
        shapes.push_str(&text_shape(
            2,
            "Title",
            title,
            "b",
            &[paragraph(&slide.outline.title, 3200, true, TITLE_COLOR, false)],
        ));

        let bullets: Vec<String> = slide
            .outline
            .bullets
            .iter()
            .map(|b| paragraph(b, 1800, false, TEXT_COLOR, true))
            .collect();
        shapes.push_str(&text_shape(3, "Content", body, "t", &bullets));

        shapes.push_str(&picture_shape(
            4,
            &format!("Image {}", slide_num),
            &slide.outline.visual_intent,
            picture,
        ));

        if self.config.captions {
            let caption = Frame {
                x: picture_box.x,
                y: picture_box.y + picture_box.cy + cy / 100,
                cx: picture_box.cx,
                cy: cy * 8 / 100,
            };
            shapes.push_str(&text_shape(
                5,
                "Caption",
                caption,
                "t",
                &[caption_paragraph(&slide.outline.visual_intent)],
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">
    <p:cSld>
        <p:spTree>
            <p:nvGrpSpPr>
                <p:cNvPr id="1" name=""/>
                <p:cNvGrpSpPr/>
                <p:nvPr/>
            </p:nvGrpSpPr>
            <p:grpSpPr>
                <a:xfrm>
                    <a:off x="0" y="0"/>
                    <a:ext cx="0" cy="0"/>
                    <a:chOff x="0" y="0"/>
                    <a:chExt cx="0" cy="0"/>
                </a:xfrm>
            </p:grpSpPr>
{shapes}        </p:spTree>
    </p:cSld>
    <p:clrMapOvr>
        <a:masterClrMapping/>
    </p:clrMapOvr>
</p:sld>"#,
            a = NS_A,
            r = NS_R,
            p = NS_P,
            shapes = shapes
        )
    }
}

fn add_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    options: FileOptions,
    bytes: &[u8],
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(bytes)?;
    Ok(())
}

/// The built-in image used when no real image was found: a muted blue
/// gradient with a lighter frame.
pub fn placeholder_image() -> Result<EmbeddedImage> {
    let (w, h) = (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    let buffer = ImageBuffer::from_fn(w, h, |x, y| {
        let border = x < 8 || y < 8 || x >= w - 8 || y >= h - 8;
        if border {
            Rgb([200u8, 214, 229])
        } else {
            let shade = (y * 60 / h) as u8;
            Rgb([31 + shade, 78 + shade, 121 + shade])
        }
    });

    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(buffer).write_to(&mut png, image::ImageOutputFormat::Png)?;

    Ok(EmbeddedImage {
        bytes: png.into_inner(),
        format: ImageFormat::Png,
        width: w,
        height: h,
    })
}

/// Escape text for XML, dropping characters XML 1.0 does not allow.
fn xml_text(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    };
    if text.chars().all(allowed) {
        escape(text)
    } else {
        let cleaned: String = text.chars().filter(|c| allowed(*c)).collect();
        Cow::Owned(escape(&cleaned).into_owned())
    }
}

fn paragraph(text: &str, size: u32, bold: bool, color: &str, bullet: bool) -> String {
    let ppr = if bullet {
        r#"<a:pPr marL="285750" indent="-285750"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>"#
    } else {
        ""
    };
    format!(
        r#"<a:p>{ppr}<a:r><a:rPr lang="en-US" sz="{size}"{bold} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="Calibri"/></a:rPr><a:t>{text}</a:t></a:r></a:p>"#,
        ppr = ppr,
        size = size,
        bold = if bold { r#" b="1""# } else { "" },
        color = color,
        text = xml_text(text)
    )
}

fn caption_paragraph(text: &str) -> String {
    format!(
        r#"<a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="1000" i="1" dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="Calibri"/></a:rPr><a:t>{text}</a:t></a:r></a:p>"#,
        color = CAPTION_COLOR,
        text = xml_text(text)
    )
}

fn text_shape(id: u32, name: &str, frame: Frame, anchor: &str, paragraphs: &[String]) -> String {
    format!(
        r#"            <p:sp>
                <p:nvSpPr>
                    <p:cNvPr id="{id}" name="{name}"/>
                    <p:cNvSpPr txBox="1"/>
                    <p:nvPr/>
                </p:nvSpPr>
                <p:spPr>
                    <a:xfrm>
                        <a:off x="{x}" y="{y}"/>
                        <a:ext cx="{cx}" cy="{cy}"/>
                    </a:xfrm>
                    <a:prstGeom prst="rect">
                        <a:avLst/>
                    </a:prstGeom>
                    <a:noFill/>
                </p:spPr>
                <p:txBody>
                    <a:bodyPr wrap="square" anchor="{anchor}">
                        <a:normAutofit/>
                    </a:bodyPr>
                    <a:lstStyle/>
                    {paragraphs}
                </p:txBody>
            </p:sp>
"#,
        id = id,
        name = xml_text(name),
        x = frame.x,
        y = frame.y,
        cx = frame.cx,
        cy = frame.cy,
        anchor = anchor,
        paragraphs = paragraphs.join("\n                    ")
    )
}

fn picture_shape(id: u32, name: &str, description: &str, frame: Frame) -> String {
    format!(
        r#"            <p:pic>
                <p:nvPicPr>
                    <p:cNvPr id="{id}" name="{name}" descr="{descr}"/>
                    <p:cNvPicPr>
                        <a:picLocks noChangeAspect="1"/>
                    </p:cNvPicPr>
                    <p:nvPr/>
                </p:nvPicPr>
                <p:blipFill>
                    <a:blip r:embed="rId2"/>
                    <a:stretch>
                        <a:fillRect/>
                    </a:stretch>
                </p:blipFill>
                <p:spPr>
                    <a:xfrm>
                        <a:off x="{x}" y="{y}"/>
                        <a:ext cx="{cx}" cy="{cy}"/>
                    </a:xfrm>
                    <a:prstGeom prst="rect">
                        <a:avLst/>
                    </a:prstGeom>
                </p:spPr>
            </p:pic>
"#,
        id = id,
        name = xml_text(name),
        descr = xml_text(description),
        x = frame.x,
        y = frame.y,
        cx = frame.cx,
        cy = frame.cy
    )
}

fn content_types_xml(slide_count: usize) -> String {
    let slides = (1..=slide_count)
        .map(|i| {
            format!(
                r#"    <Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                i
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="jpeg" ContentType="{jpeg}"/>
    <Default Extension="png" ContentType="{png}"/>
    <Default Extension="gif" ContentType="{gif}"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
    <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
    <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
{slides}
</Types>"#,
        jpeg = ImageFormat::Jpeg.content_type(),
        png = ImageFormat::Png.content_type(),
        gif = ImageFormat::Gif.content_type(),
        slides = slides
    )
}

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>finance-deck</Application>
    <Slides>{}</Slides>
</Properties>"#,
        slide_count
    )
}

fn core_xml(title: &str, summary: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:description>{}</dc:description>
    <dc:creator>finance-deck</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        xml_text(title),
        xml_text(summary),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    )
}

fn presentation_xml(slide_count: usize, cx: u64, cy: u64) -> String {
    // rId1 is the master, slides follow from rId2.
    let slide_ids = (0..slide_count)
        .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2))
        .collect::<Vec<String>>()
        .join("\n");
    let size_type = if cx == 9144000 { r#" type="screen4x3""# } else { "" };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1">
    <p:sldMasterIdLst>
        <p:sldMasterId id="2147483648" r:id="rId1"/>
    </p:sldMasterIdLst>
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}"{size_type}/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        slide_ids = slide_ids,
        cx = cx,
        cy = cy,
        size_type = size_type
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    rels.push_str(&format!(
        r#"    <Relationship Id="rId1" Type="{}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
        REL_BASE
    ));
    rels.push('\n');

    // Add relationship for each slide
    for i in 0..slide_count {
        rels.push_str(&format!(
            r#"    <Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            i + 2,
            REL_BASE,
            i + 1
        ));
        rels.push('\n');
    }

    rels.push_str(&format!(
        r#"    <Relationship Id="rId{}" Type="{}/theme" Target="theme/theme1.xml"/>"#,
        slide_count + 2,
        REL_BASE
    ));
    rels.push('\n');
    rels.push_str("</Relationships>");
    rels
}

fn slide_rels_xml(media_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="{base}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
    <Relationship Id="rId2" Type="{base}/image" Target="../media/{media}"/>
</Relationships>"#,
        base = REL_BASE,
        media = media_name
    )
}

const EMPTY_SP_TREE: &str = r#"<p:spTree>
            <p:nvGrpSpPr>
                <p:cNvPr id="1" name=""/>
                <p:cNvGrpSpPr/>
                <p:nvPr/>
            </p:nvGrpSpPr>
            <p:grpSpPr/>
        </p:spTree>"#;

fn slide_master_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">
    <p:cSld>
        <p:bg>
            <p:bgRef idx="1001">
                <a:schemeClr val="bg1"/>
            </p:bgRef>
        </p:bg>
        {tree}
    </p:cSld>
    <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
    <p:sldLayoutIdLst>
        <p:sldLayoutId id="2147483649" r:id="rId1"/>
    </p:sldLayoutIdLst>
</p:sldMaster>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = EMPTY_SP_TREE
    )
}

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
</Relationships>"#;

fn slide_layout_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="blank" preserve="1">
    <p:cSld name="Blank">
        {tree}
    </p:cSld>
    <p:clrMapOvr>
        <a:masterClrMapping/>
    </p:clrMapOvr>
</p:sldLayout>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = EMPTY_SP_TREE
    )
}

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Finance">
    <a:themeElements>
        <a:clrScheme name="Finance">
            <a:dk1><a:srgbClr val="000000"/></a:dk1>
            <a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>
            <a:dk2><a:srgbClr val="1F4E79"/></a:dk2>
            <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
            <a:accent1><a:srgbClr val="4A90E2"/></a:accent1>
            <a:accent2><a:srgbClr val="7BB3F0"/></a:accent2>
            <a:accent3><a:srgbClr val="28A745"/></a:accent3>
            <a:accent4><a:srgbClr val="FFC107"/></a:accent4>
            <a:accent5><a:srgbClr val="DC3545"/></a:accent5>
            <a:accent6><a:srgbClr val="333333"/></a:accent6>
            <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
            <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
        </a:clrScheme>
        <a:fontScheme name="Finance">
            <a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
            <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
        </a:fontScheme>
        <a:fmtScheme name="Finance">
            <a:fillStyleLst>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
            </a:fillStyleLst>
            <a:lnStyleLst>
                <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
                <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
                <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
            </a:lnStyleLst>
            <a:effectStyleLst>
                <a:effectStyle><a:effectLst/></a:effectStyle>
                <a:effectStyle><a:effectLst/></a:effectStyle>
                <a:effectStyle><a:effectLst/></a:effectStyle>
            </a:effectStyleLst>
            <a:bgFillStyleLst>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
            </a:bgFillStyleLst>
        </a:fmtScheme>
    </a:themeElements>
</a:theme>"#;
