use core::fmt;
use std::{future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer,
};
use serde_json::{Number, Value};

use crate::eval::evaluator::{EvalError, EvalResult};

// Expression tree node, as handed over by the caller
#[derive(Debug, Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Node>),
    /// Ordered entries; only the first one takes part in evaluation.
    Map(Vec<(String, Node)>),
    Predicate(Predicate),
}

impl Node {
    /// Single entry map node `{ key: value }`.
    pub fn entry<K: Into<String>, V: Into<Node>>(key: K, value: V) -> Self {
        Node::Map(vec![(key.into(), value.into())])
    }

    pub fn and<I: IntoIterator<Item = Node>>(operands: I) -> Self {
        Node::entry("$and", Node::List(operands.into_iter().collect()))
    }

    pub fn or<I: IntoIterator<Item = Node>>(operands: I) -> Self {
        Node::entry("$or", Node::List(operands.into_iter().collect()))
    }

    /// Function node forwarding `args` to the registered function `name`.
    pub fn call<K: Into<String>, V: Into<Node>>(name: K, args: V) -> Self {
        Node::entry(name, args)
    }

    pub fn predicate<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<Output>,
    {
        Node::Predicate(Predicate::new(f))
    }

    pub fn async_predicate<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Into<Value>,
    {
        Node::Predicate(Predicate::new_async(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Converts a data-only node into a JSON value for use as a function
    /// argument. Predicates have no data representation.
    pub fn to_value(&self) -> EvalResult<Value> {
        Ok(match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::List(items) => Value::Array(
                items
                    .iter()
                    .map(Node::to_value)
                    .collect::<EvalResult<Vec<_>>>()?,
            ),
            Node::Map(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_value()?);
                }
                Value::Object(map)
            }
            Node::Predicate(_) => return Err(EvalError::unexpected_token(self)),
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Null => write!(f, "null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => write!(f, "{}", s),
            Node::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Node::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Node::Predicate(_) => write!(f, "[predicate]"),
        }
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(n: $ty) -> Self {
                    Node::Number(n.into())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64);

impl From<Predicate> for Node {
    fn from(predicate: Predicate) -> Self {
        Node::Predicate(predicate)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::List(items)
    }
}

// Entry order follows the map's iteration order, which is sorted unless
// serde_json is built with `preserve_order`.
impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an expression node")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Number::from_f64(v)
            .map(Node::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            entries.push((key, value));
        }
        Ok(Node::Map(entries))
    }
}

// Result of calling a predicate or a registered function
pub enum Output {
    Ready(Value),
    Deferred(BoxFuture<'static, Value>),
}

impl Output {
    pub fn deferred<Fut>(future: Fut) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Into<Value>,
    {
        Output::Deferred(future.map(Into::<Value>::into).boxed())
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Output::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Output::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl From<bool> for Output {
    fn from(b: bool) -> Self {
        Output::Ready(Value::Bool(b))
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Output::Ready(value)
    }
}

/// Zero-argument callable leaf of an expression tree.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn() -> Output + Send + Sync>);

impl Predicate {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<Output>,
    {
        Self(Arc::new(move || -> Output { f().into() }))
    }

    pub fn new_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Into<Value>,
    {
        Self(Arc::new(move || Output::deferred(f())))
    }

    pub fn call(&self) -> Output {
        (self.0)()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Predicate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_entry_order() {
        let node: Node = serde_json::from_str(r#"{"$or": [false], "$and": [true]}"#).unwrap();
        match node {
            Node::Map(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["$or", "$and"]);
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_scalars() {
        assert!(matches!(serde_json::from_str::<Node>("true").unwrap(), Node::Bool(true)));
        assert!(matches!(serde_json::from_str::<Node>("null").unwrap(), Node::Null));
        assert!(matches!(
            serde_json::from_str::<Node>("\"x\"").unwrap(),
            Node::String(s) if s == "x"
        ));
        assert!(matches!(
            serde_json::from_str::<Node>("-3").unwrap(),
            Node::Number(n) if n.as_i64() == Some(-3)
        ));
    }

    #[test]
    fn test_display_matches_token_rendering() {
        assert_eq!(Node::from("some string").to_string(), "some string");
        assert_eq!(Node::from(201).to_string(), "201");
        assert_eq!(Node::Null.to_string(), "null");
        assert_eq!(Node::from(vec![Node::from(1), Node::from("a")]).to_string(), "1,a");
        assert_eq!(Node::predicate(|| true).to_string(), "[predicate]");
        assert_eq!(Node::call("isEven", 4).to_string(), "{isEven: 4}");
    }

    #[test]
    fn test_to_value() {
        let node = Node::from(json!([5, [1, 3, 4], {"a": null}]));
        assert_eq!(node.to_value().unwrap(), json!([5, [1, 3, 4], {"a": null}]));

        let node = Node::List(vec![Node::from(1), Node::predicate(|| true)]);
        assert!(matches!(
            node.to_value(),
            Err(EvalError::UnexpectedToken(token)) if token == "[predicate]"
        ));
    }

    #[test]
    fn test_builders() {
        let node = Node::and([true.into(), Node::or([false.into()])]);
        assert_eq!(node.to_value().unwrap(), json!({"$and": [true, {"$or": [false]}]}));
    }

    #[tokio::test]
    async fn test_predicate_outputs() {
        let ready = Predicate::new(|| true);
        assert!(matches!(ready.call(), Output::Ready(Value::Bool(true))));

        let deferred = Predicate::new_async(|| async { false });
        match deferred.call() {
            Output::Deferred(future) => assert_eq!(future.await, Value::Bool(false)),
            other => panic!("expected deferred output, got {:?}", other),
        }
    }
}
