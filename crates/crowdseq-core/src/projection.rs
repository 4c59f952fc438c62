//! Nested, per-call-site representations of the entity graph.
//!
//! The Gene → Variant → Transcript → AminoAcidChange → Gene cycle is cut by
//! construction: each view type embeds only flatter types, never itself or
//! a type that could embed it again.
//!
//! | View | Embeds |
//! |------|--------|
//! | [`GeneWithAnnotations`] | annotations |
//! | [`GeneDetail`] | annotations, bare variants |
//! | [`TranscriptWithAaChanges`] | bare amino-acid changes |
//! | [`VariantWithRelations`] | transcripts (with aa changes), gene (with annotations) |
//! | [`VariantDetail`] | [`VariantWithRelations`], ANNOVAR record |
//! | [`AaChangeDetail`] | annotations, genes (with annotations), bare transcripts |
//!
//! Loaders issue one statement per relation for the whole batch.

use crate::error::Result;
use crate::store::Store;
use crate::types::{
    AminoAcidAnnotation, AminoAcidChange, AnnovarData, Gene, GeneAnnotation, Transcript, Variant,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneWithAnnotations {
    #[serde(flatten)]
    pub gene: Gene,
    pub annotations: Vec<GeneAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneDetail {
    #[serde(flatten)]
    pub gene: Gene,
    pub annotations: Vec<GeneAnnotation>,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptWithAaChanges {
    #[serde(flatten)]
    pub transcript: Transcript,
    pub aa_changes: Vec<AminoAcidChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantWithRelations {
    #[serde(flatten)]
    pub variant: Variant,
    pub transcripts: Vec<TranscriptWithAaChanges>,
    pub gene: Option<GeneWithAnnotations>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantDetail {
    #[serde(flatten)]
    pub variant: VariantWithRelations,
    pub annovar: Option<AnnovarData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AaChangeDetail {
    #[serde(flatten)]
    pub aa_change: AminoAcidChange,
    pub annotations: Vec<AminoAcidAnnotation>,
    pub genes: Vec<GeneWithAnnotations>,
    pub transcripts: Vec<Transcript>,
}

/// Builds view types from flat records using batched store reads.
pub struct Projector<'a> {
    store: &'a Store,
}

impl<'a> Projector<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn genes_with_annotations(&self, genes: Vec<Gene>) -> Result<Vec<GeneWithAnnotations>> {
        let ids: Vec<i64> = genes.iter().map(|g| g.id).collect();
        let mut annotations = self.store.gene_annotations(&ids)?;
        Ok(genes
            .into_iter()
            .map(|gene| GeneWithAnnotations {
                annotations: annotations.remove(&gene.id).unwrap_or_default(),
                gene,
            })
            .collect())
    }

    pub fn gene_detail(&self, gene: Gene) -> Result<GeneDetail> {
        let ids = [gene.id];
        let annotations = self.store.gene_annotations(&ids)?.remove(&gene.id);
        let variants = self.store.variants_of_genes(&ids)?.remove(&gene.id);
        Ok(GeneDetail {
            gene,
            annotations: annotations.unwrap_or_default(),
            variants: variants.unwrap_or_default(),
        })
    }

    pub fn variants_with_relations(
        &self,
        variants: Vec<Variant>,
    ) -> Result<Vec<VariantWithRelations>> {
        let mut relations = self.variant_relations(&variants)?;
        Ok(variants
            .into_iter()
            .map(|variant| relations.attach(variant))
            .collect())
    }

    pub fn variant_detail(&self, variant: Variant) -> Result<VariantDetail> {
        let annovar = self.store.annovar_for_variant(variant.id)?;
        let mut relations = self.variant_relations(std::slice::from_ref(&variant))?;
        Ok(VariantDetail {
            variant: relations.attach(variant),
            annovar,
        })
    }

    fn variant_relations(&self, variants: &[Variant]) -> Result<VariantRelations> {
        let variant_ids: Vec<i64> = variants.iter().map(|v| v.id).collect();
        let transcripts = self.store.transcripts_of_variants(&variant_ids)?;

        let mut transcript_ids: Vec<i64> = transcripts.values().flatten().map(|t| t.id).collect();
        transcript_ids.sort_unstable();
        transcript_ids.dedup();
        let aa_changes = self.store.aa_changes_of_transcripts(&transcript_ids)?;

        let mut gene_ids: Vec<i64> = variants.iter().filter_map(|v| v.gene_id).collect();
        gene_ids.sort_unstable();
        gene_ids.dedup();
        let genes = self
            .genes_with_annotations(self.store.genes_by_id(&gene_ids)?.into_values().collect())?
            .into_iter()
            .map(|g| (g.gene.id, g))
            .collect();

        Ok(VariantRelations {
            transcripts,
            aa_changes,
            genes,
        })
    }

    pub fn aa_change_detail(&self, aa_change: AminoAcidChange) -> Result<AaChangeDetail> {
        let ids = [aa_change.id];
        let annotations = self.store.aa_annotations(&ids)?.remove(&aa_change.id);
        let genes = self.store.genes_of_aa_changes(&ids)?.remove(&aa_change.id);
        let transcripts = self.store.transcripts_of_aa_changes(&ids)?.remove(&aa_change.id);
        Ok(AaChangeDetail {
            aa_change,
            annotations: annotations.unwrap_or_default(),
            genes: self.genes_with_annotations(genes.unwrap_or_default())?,
            transcripts: transcripts.unwrap_or_default(),
        })
    }
}

/// Relations of a batch of variants, loaded once and handed out per variant.
struct VariantRelations {
    transcripts: HashMap<i64, Vec<Transcript>>,
    aa_changes: HashMap<i64, Vec<AminoAcidChange>>,
    genes: HashMap<i64, GeneWithAnnotations>,
}

impl VariantRelations {
    fn attach(&mut self, variant: Variant) -> VariantWithRelations {
        let transcripts = self
            .transcripts
            .remove(&variant.id)
            .unwrap_or_default()
            .into_iter()
            .map(|transcript| TranscriptWithAaChanges {
                aa_changes: self.aa_changes.get(&transcript.id).cloned().unwrap_or_default(),
                transcript,
            })
            .collect();
        let gene = variant.gene_id.and_then(|id| self.genes.get(&id).cloned());
        VariantWithRelations {
            variant,
            transcripts,
            gene,
        }
    }
}
