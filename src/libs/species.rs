use indexmap::IndexMap;

use crate::libs::maf::{MafBlock, MafComp};

/// A gap-free sequence ready to be written as a FASTA record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FasEntry {
    pub id: String,
    pub description: String,
    pub residues: String,
}

impl FasEntry {
    /// ```
    /// use mafsplit::libs::maf::MafComp;
    /// use mafsplit::libs::species::FasEntry;
    ///
    /// let comp = MafComp {
    ///     src: "mm10.chr2".to_string(),
    ///     text: "a-c-GT".to_string(),
    ///     ..Default::default()
    /// };
    /// let entry = FasEntry::from_comp(comp);
    /// assert_eq!(entry.id, "mm10.chr2");
    /// assert_eq!(entry.description, "");
    /// assert_eq!(entry.residues, "acGT");
    /// ```
    pub fn from_comp(comp: MafComp) -> Self {
        Self {
            residues: degap(&comp.text),
            id: comp.src,
            description: String::new(),
        }
    }
}

/// The genome part of a MAF source name, i.e. everything before the first `.`.
///
/// ```
/// use mafsplit::libs::species::species_of;
/// assert_eq!(species_of("hg38.chr1"), "hg38");
/// assert_eq!(species_of("Spar.gi_29362578.1"), "Spar");
/// assert_eq!(species_of("baboon"), "baboon");
/// ```
pub fn species_of(src: &str) -> &str {
    match src.split_once('.') {
        Some((species, _)) => species,
        None => src,
    }
}

/// Removes alignment gaps (`-`). Nothing else is touched.
///
/// ```
/// use mafsplit::libs::species::degap;
/// assert_eq!(degap("AC--GT--"), "ACGT");
/// assert_eq!(degap("nn-Ac"), "nnAc");
/// assert_eq!(degap("----"), "");
/// ```
pub fn degap(text: &str) -> String {
    text.chars().filter(|&c| c != '-').collect()
}

/// Sequences grouped by species, both in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct SpeciesSeqs {
    seqs_of: IndexMap<String, Vec<FasEntry>>,
}

impl SpeciesSeqs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a whole block stream, stopping at the first error.
    pub fn from_blocks<I, E>(blocks: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<MafBlock, E>>,
    {
        let mut seqs = Self::new();
        for block in blocks {
            seqs.push_block(block?);
        }
        Ok(seqs)
    }

    pub fn push_block(&mut self, block: MafBlock) {
        for comp in block.components {
            self.push(comp);
        }
    }

    pub fn push(&mut self, comp: MafComp) {
        let species = species_of(&comp.src).to_string();
        self.seqs_of
            .entry(species)
            .or_default()
            .push(FasEntry::from_comp(comp));
    }

    /// Number of species
    pub fn len(&self) -> usize {
        self.seqs_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs_of.is_empty()
    }

    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.seqs_of.keys().map(|s| s.as_str())
    }

    pub fn get(&self, species: &str) -> Option<&[FasEntry]> {
        self.seqs_of.get(species).map(|v| v.as_slice())
    }
}

impl IntoIterator for SpeciesSeqs {
    type Item = (String, Vec<FasEntry>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<FasEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.seqs_of.into_iter()
    }
}
