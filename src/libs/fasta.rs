use indexmap::IndexMap;
use lru::LruCache;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::libs::error::WriteError;
use crate::libs::maf::{MafBlock, MafComp};
use crate::libs::species::{species_of, FasEntry, SpeciesSeqs};

/// Writes one unwrapped FASTA record.
///
/// ```
/// use mafsplit::libs::fasta::write_record;
/// use mafsplit::libs::species::FasEntry;
///
/// let mut out = vec![];
/// let entry = FasEntry {
///     id: "hg38.chr1".to_string(),
///     description: String::new(),
///     residues: "ACGT".to_string(),
/// };
/// write_record(&mut out, &entry).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), ">hg38.chr1\nACGT\n");
/// ```
pub fn write_record<W: Write>(writer: &mut W, entry: &FasEntry) -> std::io::Result<()> {
    if entry.description.is_empty() {
        writeln!(writer, ">{}", entry.id)?;
    } else {
        writeln!(writer, ">{} {}", entry.id, entry.description)?;
    }
    writeln!(writer, "{}", entry.residues)?;

    Ok(())
}

/// `<dir>/<species>.fasta`
pub fn fasta_path<P: AsRef<Path>>(dir: P, species: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.fasta", species))
}

fn create_dir<P: AsRef<Path>>(dir: P) -> Result<(), WriteError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn create_file(path: &Path) -> Result<Box<dyn Write>, WriteError> {
    crate::writer(path).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes all entries of one species into `<dir>/<species>.fasta`, replacing
/// any existing file. `dir` must exist.
pub fn write_species<P: AsRef<Path>>(
    species: &str,
    entries: &[FasEntry],
    dir: P,
) -> Result<PathBuf, WriteError> {
    let path = fasta_path(dir, species);
    let io_err = |source| WriteError::Write {
        path: path.clone(),
        source,
    };

    let mut writer = create_file(&path)?;
    for entry in entries {
        write_record(&mut writer, entry).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    Ok(path)
}

/// Writes every species of `seqs` to its own file under `dir`, creating `dir`
/// if needed. `on_written` is called after each file is complete.
///
/// Stops at the first failure; files already written are left in place.
pub fn write_collection<P, F>(
    seqs: SpeciesSeqs,
    dir: P,
    mut on_written: F,
) -> Result<usize, WriteError>
where
    P: AsRef<Path>,
    F: FnMut(&str, &Path),
{
    let dir = dir.as_ref();
    create_dir(dir)?;

    let mut count = 0;
    for (species, entries) in seqs {
        let path = write_species(&species, &entries, dir)?;
        log::debug!("{}: {} records", path.display(), entries.len());
        on_written(&species, &path);
        count += 1;
    }

    Ok(count)
}

/// Default number of species files [`SpeciesFastaSink`] keeps open at once
pub const MAX_OPEN_FILES: usize = 256;

/// Writes records to their species files as blocks arrive.
///
/// A species' file is truncated on its first record and appended to later.
/// At most `max_open` files stay open; the least recently used one is
/// flushed and closed to make room.
///
/// Output is byte-identical to [`write_collection`]. Open files are flushed
/// when the sink is dropped, so an aborted run keeps what was read so far.
pub struct SpeciesFastaSink {
    dir: PathBuf,
    // every species seen, in order
    path_of: IndexMap<String, PathBuf>,
    open: LruCache<String, Box<dyn Write>>,
}

impl SpeciesFastaSink {
    /// Creates `dir` if needed. No file is touched until its species shows up.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, WriteError> {
        Self::with_max_open(dir, MAX_OPEN_FILES)
    }

    /// `max_open` is raised to 1 if zero.
    pub fn with_max_open<P: AsRef<Path>>(dir: P, max_open: usize) -> Result<Self, WriteError> {
        let dir = dir.as_ref();
        create_dir(dir)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            path_of: IndexMap::new(),
            open: LruCache::new(NonZeroUsize::new(max_open).unwrap_or(NonZeroUsize::MIN)),
        })
    }

    pub fn push_block(&mut self, block: MafBlock) -> Result<(), WriteError> {
        for comp in block.components {
            self.push(comp)?;
        }
        Ok(())
    }

    pub fn push(&mut self, comp: MafComp) -> Result<(), WriteError> {
        let species = species_of(&comp.src).to_string();

        let path = match self.path_of.get(&species) {
            Some(path) => path.clone(),
            None => {
                let path = fasta_path(&self.dir, &species);
                self.close_lru_if_full()?;
                let writer = create_file(&path)?;
                self.open.put(species.clone(), writer);
                self.path_of.insert(species.clone(), path.clone());
                path
            }
        };

        if !self.open.contains(&species) {
            self.close_lru_if_full()?;
            let writer = crate::appender(&path).map_err(|source| WriteError::Write {
                path: path.clone(),
                source,
            })?;
            self.open.put(species.clone(), writer);
        }

        let Some(writer) = self.open.get_mut(&species) else {
            unreachable!("{} was just opened", species)
        };
        write_record(writer, &FasEntry::from_comp(comp))
            .map_err(|source| WriteError::Write { path, source })
    }

    fn close_lru_if_full(&mut self) -> Result<(), WriteError> {
        if self.open.len() < self.open.cap().get() {
            return Ok(());
        }

        if let Some((species, mut writer)) = self.open.pop_lru() {
            writer.flush().map_err(|source| WriteError::Write {
                path: fasta_path(&self.dir, &species),
                source,
            })?;
        }
        Ok(())
    }

    /// Number of species seen so far
    pub fn len(&self) -> usize {
        self.path_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_of.is_empty()
    }

    /// Number of files currently open
    pub fn open_files(&self) -> usize {
        self.open.len()
    }

    /// Flushes and closes every file, then reports them in the order species
    /// were first seen.
    pub fn finish<F>(mut self, mut on_written: F) -> Result<usize, WriteError>
    where
        F: FnMut(&str, &Path),
    {
        while let Some((species, mut writer)) = self.open.pop_lru() {
            writer.flush().map_err(|source| WriteError::Write {
                path: fasta_path(&self.dir, &species),
                source,
            })?;
        }

        for (species, path) in &self.path_of {
            on_written(species, path);
        }

        Ok(self.path_of.len())
    }
}
