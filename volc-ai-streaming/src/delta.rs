//! Folding streamed deltas into one completion.

use std::collections::BTreeMap;

use volc_ai_core::{Completion, FinishReason, TokenUsage, ToolCall};

use crate::chunk::ChatCompletionChunk;
use crate::error::{StreamError, StreamResult};

/// The result of ingesting one chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// More chunks are expected.
    Pending,
    /// A finishing chunk arrived; this is the finalized completion.
    Finished(Completion),
}

/// An in-progress tool call, assembled from fragments sharing an index.
#[derive(Debug, Default)]
struct ToolCallBuilder {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

/// Folds an ordered sequence of [`ChatCompletionChunk`]s into one
/// [`Completion`].
///
/// Merge rules, applied per chunk in arrival order:
///
/// - content deltas append to the accumulated text;
/// - tool-call fragments merge by index: the first fragment for an index
///   establishes id and name, and every fragment appends its argument text;
/// - usage is last-writer-wins (it normally arrives once, on the terminal
///   chunk);
/// - the first non-null finish reason finalizes the result, exactly once.
///   A tool-calls finish is authoritative: the finalized result carries the
///   assembled call list regardless of any text accumulated earlier.
///
/// Chunks with no choices update usage only. Feeding a chunk after
/// finalization is an error; the driving loop stops at
/// [`IngestOutcome::Finished`], so that path only guards misuse.
#[derive(Debug, Default)]
pub struct DeltaAccumulator {
    id: Option<String>,
    model: Option<String>,
    text: String,
    finish_reason: Option<FinishReason>,
    tool_calls: BTreeMap<u32, ToolCallBuilder>,
    usage: Option<TokenUsage>,
    finished: bool,
}

impl DeltaAccumulator {
    /// Create an accumulator for one response.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a finishing chunk has been ingested.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Merge the next chunk into the in-progress completion.
    pub fn ingest(&mut self, chunk: ChatCompletionChunk) -> StreamResult<IngestOutcome> {
        if self.finished {
            return Err(StreamError::AlreadyFinalized);
        }

        if self.id.is_none() {
            self.id = chunk.id;
        }
        if self.model.is_none() {
            self.model = chunk.model;
        }
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }

        // A choice-less chunk is the usage-only terminal frame.
        let Some(choice) = chunk.choices.into_iter().next() else {
            return Ok(IngestOutcome::Pending);
        };

        if let Some(content) = choice.delta.content {
            self.text.push_str(&content);
        }

        if let Some(fragments) = choice.delta.tool_calls {
            for fragment in fragments {
                let builder = self.tool_calls.entry(fragment.index).or_default();
                if builder.id.is_none() {
                    builder.id = fragment.id;
                }
                if builder.name.is_none() {
                    builder.name = fragment.function.name;
                }
                if let Some(arguments) = fragment.function.arguments {
                    builder.arguments.push_str(&arguments);
                }
            }
        }

        if let Some(reason) = FinishReason::from_wire(choice.finish_reason.as_deref()) {
            self.finish_reason = Some(reason);
            self.finished = true;
            return Ok(IngestOutcome::Finished(self.build_completion()));
        }
        Ok(IngestOutcome::Pending)
    }

    /// Convert whatever state was reached into an unfinalized completion.
    ///
    /// Used when the stream ends (for example with an early `[DONE]`) before
    /// a finishing chunk: the text and tool fragments accumulated so far are
    /// preserved and `finish_reason` stays `None`.
    pub fn into_partial(mut self) -> Completion {
        self.build_completion()
    }

    fn build_completion(&mut self) -> Completion {
        let tool_calls = std::mem::take(&mut self.tool_calls)
            .into_values()
            .map(|builder| ToolCall {
                id: builder.id.unwrap_or_default(),
                name: builder.name.unwrap_or_default(),
                arguments: builder.arguments,
            })
            .collect();

        Completion {
            id: self.id.take(),
            model: self.model.take(),
            text: std::mem::take(&mut self.text),
            finish_reason: self.finish_reason,
            tool_calls,
            usage: self.usage.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkChoice, ChunkDelta, ChunkFunction, ChunkToolCall};
    use pretty_assertions::assert_eq;

    fn content_chunk(content: &str, finish: Option<&str>) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: Some("c1".to_string()),
            model: Some("m".to_string()),
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    content: Some(content.to_string()),
                    ..Default::default()
                },
                finish_reason: finish.map(str::to_string),
            }],
            ..Default::default()
        }
    }

    fn tool_chunk(fragments: Vec<ChunkToolCall>, finish: Option<&str>) -> ChatCompletionChunk {
        ChatCompletionChunk {
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    tool_calls: Some(fragments),
                    ..Default::default()
                },
                finish_reason: finish.map(str::to_string),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn text_is_the_ordered_concatenation_of_deltas() {
        let mut acc = DeltaAccumulator::new();
        assert_eq!(
            acc.ingest(content_chunk("Hel", Some("null"))).unwrap(),
            IngestOutcome::Pending
        );
        assert_eq!(
            acc.ingest(content_chunk("lo ", None)).unwrap(),
            IngestOutcome::Pending
        );
        let outcome = acc.ingest(content_chunk("world", Some("stop"))).unwrap();

        let IngestOutcome::Finished(completion) = outcome else {
            panic!("expected finalization");
        };
        assert_eq!(completion.text, "Hello world");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.id.as_deref(), Some("c1"));
        assert_eq!(completion.model.as_deref(), Some("m"));
    }

    #[test]
    fn tool_call_arguments_concatenate_across_fragments() {
        let mut acc = DeltaAccumulator::new();
        acc.ingest(tool_chunk(
            vec![ChunkToolCall {
                index: 0,
                id: Some("call_1".to_string()),
                function: ChunkFunction {
                    name: Some("lookup".to_string()),
                    arguments: Some("{\"a\":".to_string()),
                },
            }],
            None,
        ))
        .unwrap();
        let outcome = acc
            .ingest(tool_chunk(
                vec![ChunkToolCall {
                    index: 0,
                    id: None,
                    function: ChunkFunction {
                        name: None,
                        arguments: Some("1}".to_string()),
                    },
                }],
                Some("tool_calls"),
            ))
            .unwrap();

        let IngestOutcome::Finished(completion) = outcome else {
            panic!("expected finalization");
        };
        assert_eq!(completion.finish_reason, Some(FinishReason::ToolCalls));
        assert!(completion.wants_tool_calls());
        assert_eq!(completion.tool_calls.len(), 1);
        assert_eq!(completion.tool_calls[0].id, "call_1");
        assert_eq!(completion.tool_calls[0].name, "lookup");
        assert_eq!(completion.tool_calls[0].arguments, "{\"a\":1}");
    }

    #[test]
    fn tool_calls_keep_fragment_index_order() {
        let mut acc = DeltaAccumulator::new();
        let outcome = acc
            .ingest(tool_chunk(
                vec![
                    ChunkToolCall {
                        index: 1,
                        id: Some("second".to_string()),
                        function: ChunkFunction {
                            name: Some("b".to_string()),
                            arguments: Some("{}".to_string()),
                        },
                    },
                    ChunkToolCall {
                        index: 0,
                        id: Some("first".to_string()),
                        function: ChunkFunction {
                            name: Some("a".to_string()),
                            arguments: Some("{}".to_string()),
                        },
                    },
                ],
                Some("tool_calls"),
            ))
            .unwrap();

        let IngestOutcome::Finished(completion) = outcome else {
            panic!("expected finalization");
        };
        let names: Vec<&str> = completion.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn usage_is_last_writer_wins_and_choiceless_chunks_stay_pending() {
        let mut acc = DeltaAccumulator::new();
        acc.ingest(content_chunk("hi", None)).unwrap();
        let usage_only = ChatCompletionChunk {
            usage: Some(TokenUsage {
                prompt_tokens: 2,
                completion_tokens: 4,
                total_tokens: 6,
            }),
            ..Default::default()
        };
        assert_eq!(acc.ingest(usage_only).unwrap(), IngestOutcome::Pending);

        let completion = acc.into_partial();
        assert_eq!(completion.text, "hi");
        assert_eq!(completion.finish_reason, None);
        assert_eq!(completion.usage.unwrap().total_tokens, 6);
    }

    #[test]
    fn ingest_after_finalization_is_an_error() {
        let mut acc = DeltaAccumulator::new();
        acc.ingest(content_chunk("done", Some("stop"))).unwrap();
        assert!(acc.is_finished());
        let err = acc.ingest(content_chunk("late", None)).unwrap_err();
        assert!(matches!(err, StreamError::AlreadyFinalized));
    }

    #[test]
    fn null_string_finish_reason_does_not_finalize() {
        let mut acc = DeltaAccumulator::new();
        assert_eq!(
            acc.ingest(content_chunk("a", Some("null"))).unwrap(),
            IngestOutcome::Pending
        );
        assert!(!acc.is_finished());
    }
}
