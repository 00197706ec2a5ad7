// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Combine orchestration.

use tanuki_schema::Subject;
use tanuki_similar::SimilarityIndex;
use tanuki_store::{for_each, BlobWriter, SubjectReader, SubjectWriter};
use tracing::{debug, info};

use crate::transform::{
    annotate_similar, check_references, format_markup, reorder_components, sort_amalgamations,
    strip_fields, unset_empty_fields,
};
use crate::{CombineConfig, CombineError, Overrides};

/// Shared, read-only state for a combine pass.
#[derive(Debug)]
pub struct Context<'a> {
    /// Similar-kanji lookups, already sorted.
    pub similarity: &'a SimilarityIndex,
    /// Human corrections.
    pub overrides: &'a Overrides,
    /// Whether to sort amalgamation lists by level.
    pub sort_amalgamations: bool,
}

/// Counts from a finished pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombineSummary {
    /// Subjects written to the output.
    pub written: usize,
    /// Subjects an override was applied to.
    pub overridden: usize,
    /// Kanji that received similar-kanji annotations.
    pub annotated: usize,
}

/// Runs one subject through every transform.
fn transform<R: SubjectReader + ?Sized>(
    subject: Subject,
    input: &R,
    ctx: &Context<'_>,
) -> Result<Subject, CombineError> {
    let subject = strip_fields(subject);
    check_references(&subject, input)?;
    let mut subject = reorder_components(subject, input)?;
    if ctx.sort_amalgamations {
        subject = sort_amalgamations(subject, input);
    }
    let subject = unset_empty_fields(subject);
    let subject = ctx.overrides.apply(subject)?;
    let subject = format_markup(subject);
    Ok(annotate_similar(subject, ctx.similarity))
}

/// Transforms every readable subject in `input` and writes it to `output`
/// under the same id. Does not close `output`.
///
/// # Errors
///
/// Stops at the first fatal transform or write error.
pub fn combine_into<R, W>(
    input: &R,
    output: &mut W,
    ctx: &Context<'_>,
) -> Result<CombineSummary, CombineError>
where
    R: SubjectReader + ?Sized,
    W: SubjectWriter,
{
    let mut summary = CombineSummary::default();
    for_each(input, |id, subject| {
        if ctx.overrides.get(id).is_some() {
            summary.overridden += 1;
        }
        let had_similar = subject.kanji().is_some_and(|k| !k.visually_similar_kanji.is_empty());
        let combined = transform(subject, input, ctx)?;
        if !had_similar && combined.kanji().is_some_and(|k| !k.visually_similar_kanji.is_empty()) {
            summary.annotated += 1;
        }
        output.write(id, &combined)?;
        summary.written += 1;
        debug!(id, kind = combined.kind_name(), "combined subject");
        Ok::<_, CombineError>(())
    })?;
    Ok(summary)
}

/// Full run: read `config.input`, build the similarity index and overrides,
/// and write `config.output`.
///
/// The output file only appears if every subject succeeds.
///
/// # Errors
///
/// Any store, similarity source or transform error.
pub fn combine(config: &CombineConfig) -> Result<CombineSummary, CombineError> {
    let input = tanuki_store::open(&config.input)?;
    info!(input = %config.input.display(), count = input.count()?, "opened input store");

    let mut similarity = SimilarityIndex::from_store(&input)?;
    for source in &config.similarity {
        similarity.add_source(source, config.score_threshold)?;
    }
    similarity.sort();

    let overrides = Overrides::load(config.overrides.as_deref());
    let ctx = Context {
        similarity: &similarity,
        overrides: &overrides,
        sort_amalgamations: config.sort_amalgamations,
    };

    let mut output = BlobWriter::create(&config.output)?;
    let summary = combine_into(&input, &mut output, &ctx)?;
    output.close()?;
    info!(
        output = %config.output.display(),
        written = summary.written,
        overridden = summary.overridden,
        annotated = summary.annotated,
        "combine finished"
    );
    Ok(summary)
}
