use crate::app::models::{CatalogEntry, CatalogFormat};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

const IFMES_XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!--
    Autogenerated by if_catalog

    You can edit or augment this file as required to flesh it out into a
    more complete IFMES catalog definition.

    This catalog conforms to IFMES version 1.1 working draft "2 September
    2005".
    -->

<RDF:RDF xmlns:RDF="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:IF="http://purl.org/int-fiction/metadata/1.1/"
         xmlns:DC="http://purl.org/dc/elements/1.1/"
         xmlns:BAF="http://wurb.com/if/"
         xmlns:IFM="http://www.logicalshift.org.uk/IF/metadata/">

<!--
    Template entry.  Only RDF:about is mandatory for Gamebox.  'IFM:story'
    may be used in place of 'BAF:game'.  If you need multiple values for an
    entry (author, say), use multiple IF: elements instead of attributes.

    <BAF:game RDF:about=""              *mandatory*
                     IF:title=""        recommended
                     IF:byline=""       or
                     IF:author=""       or
                     IF:publisher=""
                     IF:desc=""
                     IF:genre=""
                     IF:version=""
                     IF:releaseDate=""  in format "YYYY[-MM[-DD]]"
                     IF:length="">      in format "h:mm"
    </BAF:game>
    -->
"#;

const IFMES_INI_HEADER: &str = r#";GAMEBOX_0.4
;
; Autogenerated by if_catalog
;
; You can edit or augment this file as required to flesh it out into a
; more complete IFMES catalog definition.
;
; This catalog conforms to IFMES version 1.1 working draft "2 September
; 2005".


; Template entry.  In addition to standard IFMES fields, Gamebox uses
; any 'about' property as the full path to the game.  If not given,
; Gamebox will take this from the section name.
;
; [game_name]
; about=full_path_to_game   mandatory unless in the section name
; title=game_title          recommended
; byline=                   or
; author=                   or
; publisher=
; desc=
; genre=
; version=
; releaseDate=              in format YYYY[-MM[-DD]]
; length=                   in format h:mm

"#;

const IFICTION_XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!--
    Autogenerated by if_catalog

    You can edit or augment this file as required to flesh it out into a
    more complete iFiction catalog definition.

    This catalog conforms to the 'sparse' format described in "The Treaty of
    Babel, A community standard for IF bibliography", Draft 7, 13 April 2006
    ('sparse' because it lacks the normally mandatory <identification> element,
    unused by Gamebox.
    -->

<!--
    Note: the Babel download URL is expected to be "http://babel.ifarchive.org
    /download", but can be reset by setting GAMEBOX_BABEL_URL.
    -->

<ifindex version="1.0" xmlns="http://babel.ifarchive.org/protocol/iFiction/">

<!--
    Template entry.  <identification><ifid> is mandatory for the treaty, and
    Gamebox generates a game's location from that, prefixed with the Babel
    download URL.  Because this may not be what you want (for example, games
    held locally on disk), Gamebox implements <annotation><gamebox><about>,
    letting you to specify the game location.

    <story>
      <identification>
        <ifid>...</ifid>                *mandatory* (for correctness)
        <format>...</format>            *mandatory* (for correctness)
        <bafn>...</bafn>
      </identification>
      <bibliographic>
        <title>...</title>              *mandatory* (for correctness)
        <author>...</author>            *mandatory* (for correctness)
        <firstpublished>...</firstpublished>
        <genre>...</genre>
        <description>
          ...
        </description>
        <group>...</group>
      </bibliographic>
      <annotation>
        <gamebox>
          <about>...</about>            overrides url+IFID game location
          <group>...</group>
        </gamebox>
      </annotation>
      <zcode>
        <release>...</release>          recommended
      </zcode>
      <tads[2|3]>
        <version>...</version>          recommended
        <releasedate>...</releasedate>  recommended, overrides <firstpublished>
      </tads[2|3]>
    </story>
-->
"#;

/// One catalog dialect: a fixed envelope around a block per game.
///
/// Values are interpolated verbatim. Paths holding `<`, `&` or `"` will
/// produce a malformed document.
pub trait CatalogWriter {
    fn header(&self) -> &'static str;
    fn entry(&self, entry: &CatalogEntry) -> Vec<u8>;
    fn footer(&self) -> &'static str {
        ""
    }
}

pub struct IfmesXml;
pub struct IfmesIni;
pub struct IfictionXml;

impl CatalogWriter for IfmesXml {
    fn header(&self) -> &'static str {
        IFMES_XML_HEADER
    }

    fn entry(&self, entry: &CatalogEntry) -> Vec<u8> {
        [
            b"  <BAF:game RDF:about=\"file://".as_slice(),
            entry.path,
            b"\"\n      IF:title=\"".as_slice(),
            entry.title.as_slice(),
            b"\">\n  </BAF:game>\n\n".as_slice(),
        ]
        .concat()
    }

    fn footer(&self) -> &'static str {
        "</RDF:RDF>\n"
    }
}

impl CatalogWriter for IfmesIni {
    fn header(&self) -> &'static str {
        IFMES_INI_HEADER
    }

    fn entry(&self, entry: &CatalogEntry) -> Vec<u8> {
        [
            b"[".as_slice(),
            entry.path,
            b"]\nabout=file://".as_slice(),
            entry.path,
            b"\ntitle=".as_slice(),
            entry.title.as_slice(),
            b"\n\n".as_slice(),
        ]
        .concat()
    }
}

impl CatalogWriter for IfictionXml {
    fn header(&self) -> &'static str {
        IFICTION_XML_HEADER
    }

    fn entry(&self, entry: &CatalogEntry) -> Vec<u8> {
        let mut out = b"  <story>\n".to_vec();
        out.extend_from_slice(b"    <bibliographic>\n");
        out.extend_from_slice(b"      <title>");
        out.extend_from_slice(&entry.title);
        out.extend_from_slice(b"</title>\n");
        out.extend_from_slice(b"      <author>Anonymous</author>\n");
        out.extend_from_slice(b"    </bibliographic>\n");
        out.extend_from_slice(b"    <annotation>\n");
        out.extend_from_slice(b"      <gamebox>\n");
        out.extend_from_slice(b"        <about>file://");
        out.extend_from_slice(entry.path);
        out.extend_from_slice(b"</about>\n");
        out.extend_from_slice(b"      </gamebox>\n");
        out.extend_from_slice(b"    </annotation>\n");
        out.extend_from_slice(b"  </story>\n\n");
        out
    }

    fn footer(&self) -> &'static str {
        "</ifindex>\n"
    }
}

impl CatalogFormat {
    pub fn writer(self) -> Box<dyn CatalogWriter> {
        match self {
            CatalogFormat::Rdf => Box::new(IfmesXml),
            CatalogFormat::Ini => Box::new(IfmesIni),
            CatalogFormat::Ifiction => Box::new(IfictionXml),
        }
    }
}

/// Guesses a display title from a game's filename: `zork_1.z5` becomes `Zork 1`.
///
/// Stems that are not UTF-8 keep their bytes; only ASCII letters change case.
pub fn derive_title(path: &Path) -> Vec<u8> {
    let Some(stem) = path.file_stem() else {
        return Vec::new();
    };
    match stem.to_str() {
        Some(text) => title_case(&text.replace('_', " ")).into_bytes(),
        None => ascii_title_case(stem.as_encoded_bytes()),
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn ascii_title_case(bytes: &[u8]) -> Vec<u8> {
    let mut at_word_start = true;
    bytes
        .iter()
        .map(|&b| {
            let b = if b == b'_' { b' ' } else { b };
            if b.is_ascii_whitespace() {
                at_word_start = true;
                b
            } else if at_word_start {
                at_word_start = false;
                b.to_ascii_uppercase()
            } else {
                b.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Writes a complete catalog for `paths`. With `verbose`, each path is
/// echoed to `diag` after its entry is written.
pub fn write_catalog<W: Write + ?Sized, D: Write>(
    writer: &dyn CatalogWriter,
    paths: &[PathBuf],
    verbose: bool,
    out: &mut W,
    diag: &mut D,
) -> Result<()> {
    out.write_all(writer.header().as_bytes())
        .context("Failed to write catalog header")?;

    for path in paths {
        let location = path.as_os_str().as_encoded_bytes();
        let entry = CatalogEntry {
            path: location,
            title: derive_title(path),
        };
        out.write_all(&writer.entry(&entry))
            .context("Failed to write catalog entry")?;

        if verbose {
            diag.write_all(&[location, b"\n".as_slice()].concat())
                .context("Failed to write diagnostics")?;
        }
    }

    out.write_all(writer.footer().as_bytes())
        .context("Failed to write catalog footer")?;
    Ok(())
}
