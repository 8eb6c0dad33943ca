//! The tab-separated "simdata" format and its companion files.
//!
//! A simdata file starts with a header line
//! `seqName<TAB>sequence[<TAB>embeddings][<TAB>label...]` followed by one
//! row per generated sequence. Writing one also produces `<stem>_info.txt`,
//! holding the JSON description of the generator, and optionally a FASTA
//! copy of the sequences at `<stem>.fa`.

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;

use rand::RngCore;
use simdna_core::assembly::SequenceSetGenerator;
use simdna_core::labels::LabelGenerator;
use simdna_core::models::{Embedding, embeddings_from_string, embeddings_to_string};

use crate::error::{Result, SimdnaIoError};
use crate::utils::{companion_path, get_dynamic_reader, get_dynamic_writer};

pub const INFO_FILE_SUFFIX: &str = "_info";
pub const INFO_FILE_EXTENSION: &str = ".txt";
pub const FASTA_EXTENSION: &str = ".fa";
const EMBEDDINGS_COLUMN: &str = "embeddings";

/// What goes into a simdata file besides names and sequences.
#[derive(Default)]
pub struct PrintOptions<'a> {
    pub include_embeddings: bool,
    pub label_generator: Option<&'a dyn LabelGenerator>,
    pub include_fasta: bool,
    /// Prepended to every sequence name, followed by a hyphen.
    pub prefix: Option<String>,
}

impl<'a> PrintOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embeddings(mut self) -> Self {
        self.include_embeddings = true;
        self
    }

    pub fn with_labels(mut self, label_generator: &'a dyn LabelGenerator) -> Self {
        self.label_generator = Some(label_generator);
        self
    }

    pub fn with_fasta(mut self) -> Self {
        self.include_fasta = true;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    fn sequence_id(&self, seq_name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}-{}", prefix, seq_name),
            None => seq_name.to_string(),
        }
    }
}

///
/// Run `generator` and write its sequences as a simdata file.
///
/// Returns the number of sequences written.
///
/// # Arguments
///
/// - path: the simdata file to create; a `.gz` suffix compresses it
/// - generator: the sequence set to run
/// - rng: the random source handed to the generator
/// - options: optional columns and companion files
///
pub fn print_sequences(
    path: &Path,
    generator: &mut dyn SequenceSetGenerator,
    rng: &mut dyn RngCore,
    options: &PrintOptions,
) -> Result<usize> {
    let generated = generator.generate_sequences(rng)?;

    let mut writer = get_dynamic_writer(path)?;
    let mut header = String::from("seqName\tsequence");
    if options.include_embeddings {
        header.push('\t');
        header.push_str(EMBEDDINGS_COLUMN);
    }
    if let Some(labels) = options.label_generator {
        for name in labels.label_names() {
            header.push('\t');
            header.push_str(name);
        }
    }
    writeln!(writer, "{}", header)?;

    for sequence in &generated {
        let mut row = format!("{}\t{}", options.sequence_id(&sequence.seq_name), sequence.seq);
        if options.include_embeddings {
            row.push('\t');
            row.push_str(&embeddings_to_string(&sequence.embeddings));
        }
        if let Some(labels) = options.label_generator {
            for label in labels.generate_labels(sequence) {
                row.push('\t');
                row.push_str(&label.to_string());
            }
        }
        writeln!(writer, "{}", row)?;
    }
    writer.finish()?;

    if options.include_fasta {
        let mut fasta = get_dynamic_writer(&companion_path(path, "", FASTA_EXTENSION))?;
        for sequence in &generated {
            writeln!(fasta, ">{}", options.sequence_id(&sequence.seq_name))?;
            writeln!(fasta, "{}", sequence.seq)?;
        }
        fasta.finish()?;
    }

    let info_path = companion_path(path, INFO_FILE_SUFFIX, INFO_FILE_EXTENSION);
    let mut info = get_dynamic_writer(&info_path)?;
    info.write_all(serde_json::to_string_pretty(&generator.to_json())?.as_bytes())?;
    info.finish()?;

    Ok(generated.len())
}

/// The columns of a simdata file, row-aligned.
#[derive(Debug, Default)]
pub struct SimData {
    pub ids: Vec<String>,
    pub sequences: Vec<String>,
    pub embeddings: Vec<Vec<Embedding>>,
    pub labels: Vec<Vec<i64>>,
}

impl SimData {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

///
/// Read a simdata file back in.
///
/// The header decides the layout: when its third column is `embeddings` that
/// column is parsed as embeddings, and every column after the sequence and
/// embeddings is an integer label. Embeddings come back as string embeddables.
///
/// # Arguments
///
/// - path: the simdata file, optionally gzip'd
/// - ids_to_load: keep only these ids; `None` keeps every row
///
pub fn read_simdata_file(path: &Path, ids_to_load: Option<&[String]>) -> Result<SimData> {
    let reader = get_dynamic_reader(path)?;
    let wanted: Option<HashSet<&str>> =
        ids_to_load.map(|ids| ids.iter().map(String::as_str).collect());
    let mut data = SimData::default();

    let mut lines = reader.lines();
    let has_embeddings = match lines.next() {
        Some(header) => header?.split('\t').nth(2) == Some(EMBEDDINGS_COLUMN),
        None => return Ok(data),
    };
    let first_label_column = if has_embeddings { 3 } else { 2 };

    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line_number = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if columns.len() < 2 {
            return Err(SimdnaIoError::MalformedLine {
                line: line_number,
                message: format!("expected at least 2 columns, found {}", columns.len()),
            });
        }
        if let Some(wanted) = &wanted {
            if !wanted.contains(columns[0]) {
                continue;
            }
        }

        let embeddings = match columns.get(2) {
            Some(column) if has_embeddings => embeddings_from_string(column)?,
            _ => Vec::new(),
        };
        let labels = columns
            .iter()
            .skip(first_label_column)
            .map(|x| {
                x.parse::<i64>().map_err(|e| SimdnaIoError::MalformedLine {
                    line: line_number,
                    message: format!("label {:?}: {}", x, e),
                })
            })
            .collect::<Result<Vec<i64>>>()?;

        data.ids.push(columns[0].to_string());
        data.sequences.push(columns[1].to_string());
        data.embeddings.push(embeddings);
        data.labels.push(labels);
    }

    Ok(data)
}

/// The sequence column of a simdata file, for use as a background corpus.
pub fn load_background_corpus(path: &Path) -> Result<Vec<String>> {
    Ok(read_simdata_file(path, None)?.sequences)
}
