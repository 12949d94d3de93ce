/*
This file is part of the GeoScript Binding Layer
Copyright (C) 2022 Novel-T

The GeoScript Binding Layer is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
//! Factory registry and configuration driven dispatch.
//!
//! A [`Registry`] is an ordered list of [`Factory`] entries.  Each entry pairs
//! the kind of wrapper it builds with a `handles` predicate over the
//! normalized configuration.  [`Context::create_as`] walks the entries in
//! dispatch order, skips kinds the requested [`Capability`] does not cover,
//! and builds the first one whose predicate matches.
//!
//! Dispatch order is descending priority, then registration order.  The
//! default factories all use priority 0.

use std::cmp::Reverse;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use feature_engine::{Engine, MemoryEngine};
use itertools::Itertools;
use log::debug;
use serde_json::Value;

use crate::config::{discriminator, normalize, ConfigMap};
use crate::errors::ErrorKind;
use crate::feature::{Feature, Field, Schema};
use crate::geom::Geometry;
use crate::layer::Layer;
use crate::style::{Composite, Fill, Shape, Stroke, Symbolizer};

/// The concrete wrapper types a factory can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Schema,
    Field,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Feature,
    Layer,
    Fill,
    Stroke,
    Shape,
    Composite,
}

pub(crate) const GEOMETRY_KINDS: [Kind; 7] = [
    Kind::Point,
    Kind::LineString,
    Kind::Polygon,
    Kind::MultiPoint,
    Kind::MultiLineString,
    Kind::MultiPolygon,
    Kind::GeometryCollection,
];

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Schema => "Schema",
            Kind::Field => "Field",
            Kind::Point => "Point",
            Kind::LineString => "LineString",
            Kind::Polygon => "Polygon",
            Kind::MultiPoint => "MultiPoint",
            Kind::MultiLineString => "MultiLineString",
            Kind::MultiPolygon => "MultiPolygon",
            Kind::GeometryCollection => "GeometryCollection",
            Kind::Feature => "Feature",
            Kind::Layer => "Layer",
            Kind::Fill => "Fill",
            Kind::Stroke => "Stroke",
            Kind::Shape => "Shape",
            Kind::Composite => "Composite",
        }
    }

    pub fn is_geometry(&self) -> bool {
        GEOMETRY_KINDS.contains(self)
    }

    pub fn is_symbolizer(&self) -> bool {
        matches!(self, Kind::Fill | Kind::Stroke | Kind::Shape | Kind::Composite)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Any wrapper the registry can build
#[derive(Debug, Clone)]
pub enum Wrapper {
    Schema(Schema),
    Field(Field),
    Geometry(Geometry),
    Feature(Feature),
    Layer(Layer),
    Symbolizer(Symbolizer),
}

impl Wrapper {
    pub fn kind(&self) -> Kind {
        match self {
            Wrapper::Schema(_) => Kind::Schema,
            Wrapper::Field(_) => Kind::Field,
            Wrapper::Geometry(g) => g.kind(),
            Wrapper::Feature(_) => Kind::Feature,
            Wrapper::Layer(_) => Kind::Layer,
            Wrapper::Symbolizer(s) => s.kind(),
        }
    }

    pub fn config(&self) -> ConfigMap {
        match self {
            Wrapper::Schema(w) => w.config(),
            Wrapper::Field(w) => w.config(),
            Wrapper::Geometry(w) => w.config(),
            Wrapper::Feature(w) => w.config(),
            Wrapper::Layer(w) => w.config(),
            Wrapper::Symbolizer(w) => w.config(),
        }
    }
}

/// Construction of a wrapper from normalized configuration
pub trait FromConfig: Sized {
    const KIND: Kind;

    /// Does this wrapper type accept the configuration.  Must not touch the engine.
    fn handles(config: &ConfigMap) -> bool;

    fn from_config(config: ConfigMap, context: &Context) -> Result<Self>;
}

/// A base capability dispatch can be narrowed to
pub trait Capability: Sized {
    const NAME: &'static str;

    fn accepts(kind: Kind) -> bool;

    fn from_wrapper(wrapper: Wrapper) -> Result<Self>;
}

impl Capability for Wrapper {
    const NAME: &'static str = "Wrapper";

    fn accepts(_kind: Kind) -> bool {
        true
    }

    fn from_wrapper(wrapper: Wrapper) -> Result<Self> {
        Ok(wrapper)
    }
}

macro_rules! capability {
    ($ty:ident, $variant:ident, $accepts:expr) => {
        impl Capability for $ty {
            const NAME: &'static str = stringify!($ty);

            fn accepts(kind: Kind) -> bool {
                ($accepts)(kind)
            }

            fn from_wrapper(wrapper: Wrapper) -> Result<Self> {
                match wrapper {
                    Wrapper::$variant(w) => Ok(w),
                    other => Err(ErrorKind::TypeMismatch {
                        property: "type".to_string(),
                        expected: stringify!($ty),
                        found: other.kind().name(),
                    })?,
                }
            }
        }

        impl From<$ty> for Wrapper {
            fn from(w: $ty) -> Wrapper {
                Wrapper::$variant(w)
            }
        }
    };
}

capability!(Schema, Schema, |kind| kind == Kind::Schema);
capability!(Field, Field, |kind| kind == Kind::Field);
capability!(Geometry, Geometry, |kind: Kind| kind.is_geometry());
capability!(Feature, Feature, |kind| kind == Kind::Feature);
capability!(Layer, Layer, |kind| kind == Kind::Layer);
capability!(Symbolizer, Symbolizer, |kind: Kind| kind.is_symbolizer());

type Handles = dyn Fn(&ConfigMap) -> bool;
type Create = dyn Fn(ConfigMap, &Context) -> Result<Wrapper>;

/// A registry entry: what it builds, when it applies, how it builds
pub struct Factory {
    kind: Kind,
    priority: i32,
    handles: Box<Handles>,
    create: Box<Create>,
}

impl Factory {
    pub fn new<H, C>(kind: Kind, handles: H, create: C) -> Factory
    where
        H: Fn(&ConfigMap) -> bool + 'static,
        C: Fn(ConfigMap, &Context) -> Result<Wrapper> + 'static,
    {
        Factory {
            kind,
            priority: 0,
            handles: Box::new(handles),
            create: Box::new(create),
        }
    }

    /// Factory for a wrapper type building exactly one kind
    pub fn of<W>() -> Factory
    where
        W: FromConfig + Into<Wrapper> + 'static,
    {
        Factory::new(W::KIND, W::handles, |config, context| {
            Ok(W::from_config(config, context)?.into())
        })
    }

    /// Higher priorities are consulted first
    pub fn with_priority(mut self, priority: i32) -> Factory {
        self.priority = priority;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn handles(&self, config: &ConfigMap) -> bool {
        (self.handles)(config)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Append only list of factories
#[derive(Debug, Default)]
pub struct Registry {
    factories: Vec<Factory>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Registry holding the default factories.
    ///
    /// Order matters for configurations more than one predicate accepts:
    /// schema, field, feature, layer, the geometries, then the symbolizers.
    pub fn with_defaults() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(Factory::of::<Schema>())
            .register(Factory::of::<Field>())
            .register(Factory::of::<Feature>())
            .register(Factory::of::<Layer>());
        for kind in GEOMETRY_KINDS {
            registry.register(Geometry::factory(kind));
        }
        registry
            .register(Factory::of::<Composite>())
            .register(Factory::of::<Fill>())
            .register(Factory::of::<Stroke>())
            .register(Factory::of::<Shape>());
        registry
    }

    pub fn register(&mut self, factory: Factory) -> &mut Registry {
        debug!(
            "Registering {} factory with priority {}",
            factory.kind, factory.priority
        );
        self.factories.push(factory);
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Factories in dispatch order.  The sort is stable, so equal priorities
    /// keep registration order.
    pub fn factories(&self) -> impl Iterator<Item = &Factory> {
        self.factories
            .iter()
            .sorted_by_key(|f| Reverse(f.priority))
    }

    pub fn find<C: Capability>(&self, config: &ConfigMap) -> Option<&Factory> {
        self.factories()
            .filter(|f| C::accepts(f.kind))
            .find(|f| f.handles(config))
    }
}

/// Engine plus registry, handed to every constructor
#[derive(Clone)]
pub struct Context {
    engine: Rc<dyn Engine>,
    registry: Rc<Registry>,
}

impl Context {
    pub fn new(engine: Rc<dyn Engine>) -> Context {
        Context::with_registry(engine, Registry::with_defaults())
    }

    pub fn with_registry(engine: Rc<dyn Engine>, registry: Registry) -> Context {
        Context {
            engine,
            registry: Rc::new(registry),
        }
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Builds whatever wrapper the configuration describes
    pub fn create(&self, config: &Value) -> Result<Wrapper> {
        self.create_as::<Wrapper>(config)
    }

    /// Builds a wrapper of capability `C` from untyped configuration
    pub fn create_as<C: Capability>(&self, config: &Value) -> Result<C> {
        self.create_from_map(normalize(config))
    }

    pub fn create_from_map<C: Capability>(&self, config: ConfigMap) -> Result<C> {
        let factory = match self.registry.find::<C>(&config) {
            Some(f) => f,
            None => Err(ErrorKind::NoMatchingFactory {
                capability: C::NAME,
                discriminator: discriminator(&config).map(str::to_string),
            })?,
        };

        debug!("Dispatching {} configuration to {}", C::NAME, factory.kind);
        let wrapper = (factory.create)(config, self)?;
        C::from_wrapper(wrapper)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Rc::new(MemoryEngine))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("factories", &self.registry.len())
            .finish()
    }
}
