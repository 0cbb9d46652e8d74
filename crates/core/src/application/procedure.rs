//! Procedures and their type-erased handlers.
//!
//! A [`Procedure`] pairs a name with an async handler taking
//! `(RequestContext, Input)` and returning `Output`. The input and output
//! shapes are extracted once at construction and cached for code generation.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use bytes::Bytes;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;

use super::context::RequestContext;
use crate::domain::{StructDescriptor, TypeDescriptor, TypeShape};
use crate::error::DispatchError;

/// Handler with decode and encode erased to bytes.
pub trait ErasedHandler: Send + Sync + 'static {
    /// Decode `body` into the input type. No side effects.
    fn decode(&self, body: &[u8]) -> Result<Box<dyn Any + Send>, DispatchError>;

    /// Invoke the procedure with a previously decoded input and encode its output.
    fn invoke(
        &self,
        ctx: RequestContext,
        input: Box<dyn Any + Send>,
    ) -> BoxFuture<'static, Result<Bytes, DispatchError>>;
}

/// Wrapper that deserializes the body before calling the typed handler.
struct TypedHandler<F, I, O, Fut> {
    handler: F,
    _phantom: PhantomData<fn(I) -> (O, Fut)>,
}

impl<F, I, O, Fut> ErasedHandler for TypedHandler<F, I, O, Fut>
where
    F: Fn(RequestContext, I) -> Fut + Send + Sync + 'static,
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    Fut: Future<Output = O> + Send + 'static,
{
    fn decode(&self, body: &[u8]) -> Result<Box<dyn Any + Send>, DispatchError> {
        match serde_json::from_slice::<I>(body) {
            Ok(input) => Ok(Box::new(input)),
            Err(e) => match e.classify() {
                Category::Data => Err(DispatchError::Decode(e.to_string())),
                Category::Syntax | Category::Eof | Category::Io => {
                    Err(DispatchError::BadRequest(format!("Malformed JSON body: {e}")))
                }
            },
        }
    }

    fn invoke(
        &self,
        ctx: RequestContext,
        input: Box<dyn Any + Send>,
    ) -> BoxFuture<'static, Result<Bytes, DispatchError>> {
        let input = match input.downcast::<I>() {
            Ok(input) => *input,
            Err(_) => {
                return Box::pin(async {
                    Err(DispatchError::Decode("Input does not match procedure".into()))
                })
            }
        };

        let fut = (self.handler)(ctx, input);
        Box::pin(async move {
            let output = fut.await;
            serde_json::to_vec(&output)
                .map(Bytes::from)
                .map_err(|e| DispatchError::Encoding(e.to_string()))
        })
    }
}

/// A named server-side operation
pub struct Procedure {
    name: String,
    input: TypeDescriptor,
    output: TypeDescriptor,
    /// Every struct reachable from input and output, keyed by name
    definitions: BTreeMap<String, StructDescriptor>,
    /// Type names the input and output define with different shapes
    name_clashes: Vec<String>,
    handler: Box<dyn ErasedHandler>,
}

impl Procedure {
    /// Create a procedure from an async handler.
    ///
    /// # Example
    ///
    /// ```
    /// use schemars::JsonSchema;
    /// use serde::{Deserialize, Serialize};
    /// use wirebind_core::{Procedure, RequestContext};
    ///
    /// #[derive(Deserialize, JsonSchema)]
    /// struct PingInput { seq: i64 }
    ///
    /// #[derive(Serialize, JsonSchema)]
    /// struct PingOutput { seq: i64 }
    ///
    /// async fn ping(_ctx: RequestContext, input: PingInput) -> PingOutput {
    ///     PingOutput { seq: input.seq }
    /// }
    ///
    /// let procedure = Procedure::new("ping", ping);
    /// assert_eq!(procedure.name(), "ping");
    /// ```
    pub fn new<F, I, O, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(RequestContext, I) -> Fut + Send + Sync + 'static,
        I: DeserializeOwned + JsonSchema + Send + 'static,
        O: Serialize + JsonSchema + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        let input = TypeShape::of::<I>();
        let output = TypeShape::of::<O>();

        let mut definitions = input.definitions;
        let mut name_clashes = Vec::new();
        for (type_name, def) in output.definitions {
            match definitions.get(&type_name) {
                Some(existing) if *existing != def => name_clashes.push(type_name),
                Some(_) => {}
                None => {
                    definitions.insert(type_name, def);
                }
            }
        }

        Self {
            name: name.into(),
            input: input.root,
            output: output.root,
            definitions,
            name_clashes,
            handler: Box::new(TypedHandler {
                handler,
                _phantom: PhantomData,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input type (by-name reference when it is a struct)
    pub fn input_type(&self) -> &TypeDescriptor {
        &self.input
    }

    /// Output type (by-name reference when it is a struct)
    pub fn output_type(&self) -> &TypeDescriptor {
        &self.output
    }

    pub fn definitions(&self) -> &BTreeMap<String, StructDescriptor> {
        &self.definitions
    }

    /// Struct names used by two different input/output types. Such a
    /// procedure cannot be registered.
    pub fn name_clashes(&self) -> &[String] {
        &self.name_clashes
    }

    pub(crate) fn handler(&self) -> &dyn ErasedHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrimitiveKind;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[derive(Serialize, JsonSchema)]
    struct Sum {
        total: i64,
    }

    fn sum_procedure() -> Procedure {
        Procedure::new("sum", |_ctx, p: Point| async move { Sum { total: p.x + p.y } })
    }

    #[test]
    fn test_descriptors_cached_at_construction() {
        let procedure = sum_procedure();
        assert_eq!(procedure.input_type().struct_name(), Some("Point"));
        assert_eq!(procedure.output_type().struct_name(), Some("Sum"));

        let defs = procedure.definitions();
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Point", "Sum"]);
        assert_eq!(
            defs["Sum"].fields[0].ty,
            TypeDescriptor::Primitive(PrimitiveKind::Int)
        );
    }

    #[test]
    fn test_decode_classifies_errors() {
        let procedure = sum_procedure();
        let handler = procedure.handler();

        assert!(handler.decode(br#"{"x": 1, "y": 2}"#).is_ok());
        assert!(matches!(
            handler.decode(br#"{"x": 1"#),
            Err(DispatchError::BadRequest(_))
        ));
        assert!(matches!(
            handler.decode(b"not json"),
            Err(DispatchError::BadRequest(_))
        ));
        assert!(matches!(
            handler.decode(br#"{"x": 1}"#),
            Err(DispatchError::Decode(_))
        ));
        assert!(matches!(
            handler.decode(br#"{"x": "1", "y": 2}"#),
            Err(DispatchError::Decode(_))
        ));
    }

    mod left {
        #[derive(serde::Deserialize, schemars::JsonSchema)]
        #[allow(dead_code)]
        pub struct Item {
            pub x: i64,
        }
    }

    mod right {
        #[derive(serde::Serialize, schemars::JsonSchema)]
        pub struct Item {
            pub y: String,
        }
    }

    #[test]
    fn test_same_name_different_shape_is_recorded() {
        let procedure = Procedure::new("conv", |_ctx, i: left::Item| async move {
            right::Item { y: i.x.to_string() }
        });
        assert_eq!(procedure.name_clashes().to_vec(), vec!["Item".to_string()]);
        assert!(sum_procedure().name_clashes().is_empty());
    }

    #[test]
    fn test_same_type_on_both_sides_is_not_a_clash() {
        #[derive(Serialize, Deserialize, JsonSchema)]
        struct Echo {
            text: String,
        }
        let procedure = Procedure::new("echo", |_ctx, e: Echo| async move { e });
        assert!(procedure.name_clashes().is_empty());
        assert_eq!(procedure.definitions().len(), 1);
    }

    #[test]
    fn test_primitive_io_procedure() {
        let procedure = Procedure::new("double", |_ctx, n: i64| async move { n * 2 });
        assert_eq!(
            procedure.input_type(),
            &TypeDescriptor::Primitive(PrimitiveKind::Int)
        );
        assert!(procedure.definitions().is_empty());
    }
}
