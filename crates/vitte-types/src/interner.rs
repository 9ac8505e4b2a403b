use vitte_arena::InternedStr;

use crate::builtin::BuiltinType;

/// 1-based handle into a [`TypeInterner`]; `0` is null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const NULL: TypeId = TypeId(0);
}

enum TypeData {
    Builtin(BuiltinType),
    Nominal(InternedStr),
    Fn { params_offset: u32, params_len: u32, ret: TypeId },
}

/// Structural, deduplicating type table.
pub struct TypeInterner {
    records: Vec<TypeData>,
    fn_params: Vec<TypeId>,
    builtins: [TypeId; BuiltinType::ALL.len()],
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut records = Vec::new();
        let mut builtins = [TypeId::NULL; BuiltinType::ALL.len()];
        for (i, kind) in BuiltinType::ALL.iter().enumerate() {
            records.push(TypeData::Builtin(*kind));
            builtins[i] = TypeId(records.len() as u32);
        }
        TypeInterner { records, fn_params: Vec::new(), builtins }
    }

    /// Returns the preallocated id for a primitive type.
    pub fn builtin(&self, kind: BuiltinType) -> TypeId {
        self.builtins[kind.index()]
    }

    /// Returns the id for a nominal (named, user-declared) type, scanning
    /// for an existing entry with the same interned name before appending.
    pub fn nominal(&mut self, name: InternedStr) -> TypeId {
        for (i, record) in self.records.iter().enumerate() {
            if let TypeData::Nominal(existing) = record {
                if *existing == name {
                    return TypeId(i as u32 + 1);
                }
            }
        }
        self.records.push(TypeData::Nominal(name));
        TypeId(self.records.len() as u32)
    }

    /// Returns the id for a function type with the given parameter types and
    /// return type, scanning for a structurally identical existing entry.
    pub fn fn_type(&mut self, params: &[TypeId], ret: TypeId) -> TypeId {
        for (i, record) in self.records.iter().enumerate() {
            if let TypeData::Fn { params_offset, params_len, ret: existing_ret } = record {
                if *existing_ret != ret || *params_len as usize != params.len() {
                    continue;
                }
                let start = *params_offset as usize;
                let end = start + *params_len as usize;
                if &self.fn_params[start..end] == params {
                    return TypeId(i as u32 + 1);
                }
            }
        }
        let offset = self.fn_params.len() as u32;
        self.fn_params.extend_from_slice(params);
        self.records.push(TypeData::Fn { params_offset: offset, params_len: params.len() as u32, ret });
        TypeId(self.records.len() as u32)
    }

    /// All dedup happens on the way in, so equality for every kind — builtin
    /// identity, nominal name-pointer equality, fn structural equality —
    /// collapses to comparing the two ids.
    pub fn equal(&self, a: TypeId, b: TypeId) -> bool {
        a == b
    }

    /// Renders a readable form: builtins and nominals by name, fns as
    /// `fn(T1, T2) -> R`.
    pub fn format(&self, ty: TypeId, resolve_name: impl Fn(InternedStr) -> String + Copy) -> String {
        match self.records.get(ty.0 as usize - 1) {
            Some(TypeData::Builtin(kind)) => kind.name().to_string(),
            Some(TypeData::Nominal(name)) => resolve_name(*name),
            Some(TypeData::Fn { params_offset, params_len, ret }) => {
                let start = *params_offset as usize;
                let end = start + *params_len as usize;
                let params: Vec<String> =
                    self.fn_params[start..end].iter().map(|p| self.format(*p, resolve_name)).collect();
                format!("fn({}) -> {}", params.join(", "), self.format(*ret, resolve_name))
            }
            None => "<invalid type>".to_string(),
        }
    }
}
