//! Copy-on-write list mutators.
//!
//! Every mutator copies the owner (and any intermediate node on the path down to the list), so
//! the owner returned is new while its untouched children keep their identity.

use jrewrite_syntax::{Accepts, NodeId, NodeKind};

use crate::{Modifier, StructureError, TreeMaker};

#[derive(Debug, Clone, Copy)]
enum ListEdit {
    Insert(Option<usize>, NodeId),
    Remove(NodeId),
    RemoveAt(usize),
}

impl TreeMaker<'_> {
    fn edit_list(&mut self, owner: NodeId, path: &[&str], edit: ListEdit) -> Result<NodeId, StructureError> {
        if !self.tree.contains(owner) {
            return Err(StructureError::UnknownNode { node: owner });
        }
        let kind = self.tree.kind(owner);
        let Some((slot_name, rest)) = path.split_first() else {
            let items = self.tree.items(owner);
            let items = apply(kind, items, edit)?;
            let text = self.tree.text(owner).map(str::to_owned);
            return self.node(kind, text.as_deref(), items.into_iter().map(Some).collect());
        };

        let Some(slot) = kind.slot_index(slot_name) else {
            return Err(StructureError::NoSuchSlot {
                kind,
                slot: slot_name.to_string(),
            });
        };
        let child = match self.tree.child(owner, slot) {
            Some(child) => child,
            None => match kind.slots()[slot].accepts {
                Accepts::Kind(list) if list.is_list() => self.node(list, None, Vec::new())?,
                _ => {
                    return Err(StructureError::MissingChild {
                        kind,
                        slot: kind.slots()[slot].name,
                    })
                }
            },
        };
        let child = self.edit_list(child, rest, edit)?;
        self.replace_child(owner, slot, Some(child))
    }

    fn class_body_path(&self, class: NodeId) -> &'static [&'static str] {
        if self.tree.text(class) == Some("enum") {
            &["body", "members"]
        } else {
            &["body"]
        }
    }

    // --- class members ---

    pub fn add_class_member(&mut self, class: NodeId, member: NodeId) -> Result<NodeId, StructureError> {
        let path = self.class_body_path(class);
        self.edit_list(class, path, ListEdit::Insert(None, member))
    }

    pub fn insert_class_member(&mut self, class: NodeId, index: usize, member: NodeId) -> Result<NodeId, StructureError> {
        let path = self.class_body_path(class);
        self.edit_list(class, path, ListEdit::Insert(Some(index), member))
    }

    pub fn remove_class_member(&mut self, class: NodeId, member: NodeId) -> Result<NodeId, StructureError> {
        let path = self.class_body_path(class);
        self.edit_list(class, path, ListEdit::Remove(member))
    }

    pub fn remove_class_member_at(&mut self, class: NodeId, index: usize) -> Result<NodeId, StructureError> {
        let path = self.class_body_path(class);
        self.edit_list(class, path, ListEdit::RemoveAt(index))
    }

    // --- class implements (interface extends) ---

    pub fn add_class_implements(&mut self, class: NodeId, ty: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["implements"], ListEdit::Insert(None, ty))
    }

    pub fn insert_class_implements(&mut self, class: NodeId, index: usize, ty: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["implements"], ListEdit::Insert(Some(index), ty))
    }

    pub fn remove_class_implements(&mut self, class: NodeId, ty: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["implements"], ListEdit::Remove(ty))
    }

    pub fn remove_class_implements_at(&mut self, class: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["implements"], ListEdit::RemoveAt(index))
    }

    // --- type parameters of classes and methods ---

    pub fn add_class_type_parameter(&mut self, class: NodeId, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["type_parameters"], ListEdit::Insert(None, param))
    }

    pub fn insert_class_type_parameter(&mut self, class: NodeId, index: usize, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["type_parameters"], ListEdit::Insert(Some(index), param))
    }

    pub fn remove_class_type_parameter(&mut self, class: NodeId, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["type_parameters"], ListEdit::Remove(param))
    }

    pub fn remove_class_type_parameter_at(&mut self, class: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(class, &["type_parameters"], ListEdit::RemoveAt(index))
    }

    pub fn add_method_type_parameter(&mut self, method: NodeId, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["type_parameters"], ListEdit::Insert(None, param))
    }

    pub fn insert_method_type_parameter(&mut self, method: NodeId, index: usize, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["type_parameters"], ListEdit::Insert(Some(index), param))
    }

    pub fn remove_method_type_parameter(&mut self, method: NodeId, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["type_parameters"], ListEdit::Remove(param))
    }

    pub fn remove_method_type_parameter_at(&mut self, method: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["type_parameters"], ListEdit::RemoveAt(index))
    }

    // --- method parameters and throws ---

    pub fn add_method_parameter(&mut self, method: NodeId, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["parameters"], ListEdit::Insert(None, param))
    }

    pub fn insert_method_parameter(&mut self, method: NodeId, index: usize, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["parameters"], ListEdit::Insert(Some(index), param))
    }

    pub fn remove_method_parameter(&mut self, method: NodeId, param: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["parameters"], ListEdit::Remove(param))
    }

    pub fn remove_method_parameter_at(&mut self, method: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["parameters"], ListEdit::RemoveAt(index))
    }

    pub fn add_method_throws(&mut self, method: NodeId, ty: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["throws"], ListEdit::Insert(None, ty))
    }

    pub fn insert_method_throws(&mut self, method: NodeId, index: usize, ty: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["throws"], ListEdit::Insert(Some(index), ty))
    }

    pub fn remove_method_throws(&mut self, method: NodeId, ty: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["throws"], ListEdit::Remove(ty))
    }

    pub fn remove_method_throws_at(&mut self, method: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(method, &["throws"], ListEdit::RemoveAt(index))
    }

    // --- block statements ---

    pub fn add_block_statement(&mut self, block: NodeId, statement: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(block, &[], ListEdit::Insert(None, statement))
    }

    pub fn insert_block_statement(&mut self, block: NodeId, index: usize, statement: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(block, &[], ListEdit::Insert(Some(index), statement))
    }

    pub fn remove_block_statement(&mut self, block: NodeId, statement: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(block, &[], ListEdit::Remove(statement))
    }

    pub fn remove_block_statement_at(&mut self, block: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(block, &[], ListEdit::RemoveAt(index))
    }

    // --- call arguments ---

    pub fn add_method_invocation_argument(&mut self, call: NodeId, argument: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(call, &["arguments"], ListEdit::Insert(None, argument))
    }

    pub fn insert_method_invocation_argument(&mut self, call: NodeId, index: usize, argument: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(call, &["arguments"], ListEdit::Insert(Some(index), argument))
    }

    pub fn remove_method_invocation_argument(&mut self, call: NodeId, argument: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(call, &["arguments"], ListEdit::Remove(argument))
    }

    pub fn remove_method_invocation_argument_at(&mut self, call: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(call, &["arguments"], ListEdit::RemoveAt(index))
    }

    pub fn add_new_class_argument(&mut self, new_class: NodeId, argument: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(new_class, &["arguments"], ListEdit::Insert(None, argument))
    }

    pub fn insert_new_class_argument(&mut self, new_class: NodeId, index: usize, argument: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(new_class, &["arguments"], ListEdit::Insert(Some(index), argument))
    }

    pub fn remove_new_class_argument(&mut self, new_class: NodeId, argument: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(new_class, &["arguments"], ListEdit::Remove(argument))
    }

    pub fn remove_new_class_argument_at(&mut self, new_class: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(new_class, &["arguments"], ListEdit::RemoveAt(index))
    }

    // --- compilation unit ---

    pub fn add_comp_unit_import(&mut self, unit: NodeId, import: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["imports"], ListEdit::Insert(None, import))
    }

    pub fn insert_comp_unit_import(&mut self, unit: NodeId, index: usize, import: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["imports"], ListEdit::Insert(Some(index), import))
    }

    pub fn remove_comp_unit_import(&mut self, unit: NodeId, import: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["imports"], ListEdit::Remove(import))
    }

    pub fn remove_comp_unit_import_at(&mut self, unit: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["imports"], ListEdit::RemoveAt(index))
    }

    pub fn add_comp_unit_type_decl(&mut self, unit: NodeId, decl: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["types"], ListEdit::Insert(None, decl))
    }

    pub fn insert_comp_unit_type_decl(&mut self, unit: NodeId, index: usize, decl: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["types"], ListEdit::Insert(Some(index), decl))
    }

    pub fn remove_comp_unit_type_decl(&mut self, unit: NodeId, decl: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["types"], ListEdit::Remove(decl))
    }

    pub fn remove_comp_unit_type_decl_at(&mut self, unit: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(unit, &["types"], ListEdit::RemoveAt(index))
    }

    // --- switch ---

    pub fn add_case_statement(&mut self, case: NodeId, statement: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(case, &["statements"], ListEdit::Insert(None, statement))
    }

    pub fn insert_case_statement(&mut self, case: NodeId, index: usize, statement: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(case, &["statements"], ListEdit::Insert(Some(index), statement))
    }

    pub fn remove_case_statement(&mut self, case: NodeId, statement: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(case, &["statements"], ListEdit::Remove(statement))
    }

    pub fn remove_case_statement_at(&mut self, case: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(case, &["statements"], ListEdit::RemoveAt(index))
    }

    pub fn add_switch_case(&mut self, switch: NodeId, case: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(switch, &["cases"], ListEdit::Insert(None, case))
    }

    pub fn insert_switch_case(&mut self, switch: NodeId, index: usize, case: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(switch, &["cases"], ListEdit::Insert(Some(index), case))
    }

    pub fn remove_switch_case(&mut self, switch: NodeId, case: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(switch, &["cases"], ListEdit::Remove(case))
    }

    pub fn remove_switch_case_at(&mut self, switch: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(switch, &["cases"], ListEdit::RemoveAt(index))
    }

    // --- try ---

    pub fn add_try_catch(&mut self, try_stmt: NodeId, catch: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(try_stmt, &["catches"], ListEdit::Insert(None, catch))
    }

    pub fn insert_try_catch(&mut self, try_stmt: NodeId, index: usize, catch: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(try_stmt, &["catches"], ListEdit::Insert(Some(index), catch))
    }

    /// Fails when the `try` would be left with neither a catch nor a `finally`.
    pub fn remove_try_catch(&mut self, try_stmt: NodeId, catch: NodeId) -> Result<NodeId, StructureError> {
        let updated = self.edit_list(try_stmt, &["catches"], ListEdit::Remove(catch))?;
        self.check_try(updated)
    }

    pub fn remove_try_catch_at(&mut self, try_stmt: NodeId, index: usize) -> Result<NodeId, StructureError> {
        let updated = self.edit_list(try_stmt, &["catches"], ListEdit::RemoveAt(index))?;
        self.check_try(updated)
    }

    fn check_try(&self, try_stmt: NodeId) -> Result<NodeId, StructureError> {
        let catches = self.tree.child(try_stmt, 1).map_or(0, |list| self.tree.items(list).len());
        if catches == 0 && self.tree.child(try_stmt, 2).is_none() {
            return Err(StructureError::MissingChild {
                kind: NodeKind::Try,
                slot: "finally",
            });
        }
        Ok(try_stmt)
    }

    // --- array initializers ---

    pub fn add_new_array_element(&mut self, array: NodeId, element: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(array, &["initializer"], ListEdit::Insert(None, element))
    }

    pub fn insert_new_array_element(&mut self, array: NodeId, index: usize, element: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(array, &["initializer"], ListEdit::Insert(Some(index), element))
    }

    pub fn remove_new_array_element(&mut self, array: NodeId, element: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(array, &["initializer"], ListEdit::Remove(element))
    }

    pub fn remove_new_array_element_at(&mut self, array: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(array, &["initializer"], ListEdit::RemoveAt(index))
    }

    // --- annotations ---

    pub fn add_annotation_attr_value(&mut self, annotation: NodeId, value: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(annotation, &["arguments"], ListEdit::Insert(None, value))
    }

    pub fn insert_annotation_attr_value(&mut self, annotation: NodeId, index: usize, value: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(annotation, &["arguments"], ListEdit::Insert(Some(index), value))
    }

    pub fn remove_annotation_attr_value(&mut self, annotation: NodeId, value: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(annotation, &["arguments"], ListEdit::Remove(value))
    }

    pub fn remove_annotation_attr_value_at(&mut self, annotation: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(annotation, &["arguments"], ListEdit::RemoveAt(index))
    }

    // --- enum constants ---

    pub fn add_enum_constant(&mut self, enum_decl: NodeId, constant: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(enum_decl, &["body", "constants"], ListEdit::Insert(None, constant))
    }

    pub fn insert_enum_constant(&mut self, enum_decl: NodeId, index: usize, constant: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(enum_decl, &["body", "constants"], ListEdit::Insert(Some(index), constant))
    }

    pub fn remove_enum_constant(&mut self, enum_decl: NodeId, constant: NodeId) -> Result<NodeId, StructureError> {
        self.edit_list(enum_decl, &["body", "constants"], ListEdit::Remove(constant))
    }

    pub fn remove_enum_constant_at(&mut self, enum_decl: NodeId, index: usize) -> Result<NodeId, StructureError> {
        self.edit_list(enum_decl, &["body", "constants"], ListEdit::RemoveAt(index))
    }

    // --- modifiers ---
    //
    // Annotations and keywords share one list; annotation indices count annotations only and
    // keyword indices count keywords only.

    fn partition_modifiers(&self, modifiers: NodeId) -> (Vec<usize>, Vec<usize>) {
        let mut annotations = Vec::new();
        let mut keywords = Vec::new();
        for (pos, item) in self.tree.items(modifiers).into_iter().enumerate() {
            if self.tree.kind(item) == NodeKind::Annotation {
                annotations.push(pos);
            } else {
                keywords.push(pos);
            }
        }
        (annotations, keywords)
    }

    pub fn add_modifiers_annotation(&mut self, modifiers: NodeId, annotation: NodeId) -> Result<NodeId, StructureError> {
        let (annotations, _) = self.partition_modifiers(modifiers);
        self.insert_modifiers_annotation(modifiers, annotations.len(), annotation)
    }

    pub fn insert_modifiers_annotation(
        &mut self,
        modifiers: NodeId,
        index: usize,
        annotation: NodeId,
    ) -> Result<NodeId, StructureError> {
        let (annotations, _) = self.partition_modifiers(modifiers);
        let pos = match annotations.get(index) {
            Some(pos) => *pos,
            None if index == annotations.len() => annotations.last().map_or(0, |last| last + 1),
            None => return Err(out_of_range(NodeKind::ModifierList, index, annotations.len())),
        };
        self.edit_list(modifiers, &[], ListEdit::Insert(Some(pos), annotation))
    }

    pub fn remove_modifiers_annotation(&mut self, modifiers: NodeId, annotation: NodeId) -> Result<NodeId, StructureError> {
        if self.tree.kind(annotation) != NodeKind::Annotation {
            return Err(StructureError::NotAnElement {
                kind: NodeKind::ModifierList,
                element: annotation,
            });
        }
        self.edit_list(modifiers, &[], ListEdit::Remove(annotation))
    }

    pub fn remove_modifiers_annotation_at(&mut self, modifiers: NodeId, index: usize) -> Result<NodeId, StructureError> {
        let (annotations, _) = self.partition_modifiers(modifiers);
        let Some(pos) = annotations.get(index) else {
            return Err(out_of_range(NodeKind::ModifierList, index, annotations.len()));
        };
        self.edit_list(modifiers, &[], ListEdit::RemoveAt(*pos))
    }

    fn modifier_keyword(&self, item: NodeId) -> Option<Modifier> {
        self.tree.text(item).and_then(Modifier::from_keyword)
    }

    /// Add a keyword at its conventional position. Adding a present keyword is a no-op.
    pub fn add_modifier(&mut self, modifiers: NodeId, modifier: Modifier) -> Result<NodeId, StructureError> {
        let items = self.tree.items(modifiers);
        if items.iter().any(|item| self.modifier_keyword(*item) == Some(modifier)) {
            return Ok(modifiers);
        }
        let (annotations, keywords) = self.partition_modifiers(modifiers);
        let after_annotations = annotations.last().map_or(0, |last| last + 1);
        let pos = keywords
            .iter()
            .copied()
            .filter(|pos| *pos >= after_annotations)
            .find(|pos| self.modifier_keyword(items[*pos]).is_some_and(|m| m > modifier))
            .unwrap_or(items.len().max(after_annotations));
        let keyword = self.node(NodeKind::Modifier, Some(modifier.as_str()), Vec::new())?;
        self.edit_list(modifiers, &[], ListEdit::Insert(Some(pos), keyword))
    }

    pub fn insert_modifier(&mut self, modifiers: NodeId, index: usize, modifier: Modifier) -> Result<NodeId, StructureError> {
        let (_, keywords) = self.partition_modifiers(modifiers);
        let pos = match keywords.get(index) {
            Some(pos) => *pos,
            None if index == keywords.len() => self.tree.items(modifiers).len(),
            None => return Err(out_of_range(NodeKind::ModifierList, index, keywords.len())),
        };
        let keyword = self.node(NodeKind::Modifier, Some(modifier.as_str()), Vec::new())?;
        self.edit_list(modifiers, &[], ListEdit::Insert(Some(pos), keyword))
    }

    pub fn remove_modifier(&mut self, modifiers: NodeId, modifier: Modifier) -> Result<NodeId, StructureError> {
        let found = self
            .tree
            .items(modifiers)
            .into_iter()
            .find(|item| self.modifier_keyword(*item) == Some(modifier));
        match found {
            Some(item) => self.edit_list(modifiers, &[], ListEdit::Remove(item)),
            None => Err(StructureError::MissingModifier {
                keyword: modifier.as_str(),
            }),
        }
    }

    pub fn remove_modifier_at(&mut self, modifiers: NodeId, index: usize) -> Result<NodeId, StructureError> {
        let (_, keywords) = self.partition_modifiers(modifiers);
        let Some(pos) = keywords.get(index) else {
            return Err(out_of_range(NodeKind::ModifierList, index, keywords.len()));
        };
        self.edit_list(modifiers, &[], ListEdit::RemoveAt(*pos))
    }
}

fn out_of_range(kind: NodeKind, index: usize, len: usize) -> StructureError {
    StructureError::IndexOutOfRange { kind, index, len }
}

fn apply(kind: NodeKind, mut items: Vec<NodeId>, edit: ListEdit) -> Result<Vec<NodeId>, StructureError> {
    match edit {
        ListEdit::Insert(None, item) => items.push(item),
        ListEdit::Insert(Some(index), item) => {
            if index > items.len() {
                return Err(out_of_range(kind, index, items.len()));
            }
            items.insert(index, item);
        }
        ListEdit::Remove(element) => {
            let Some(pos) = items.iter().position(|item| *item == element) else {
                return Err(StructureError::NotAnElement { kind, element });
            };
            items.remove(pos);
        }
        ListEdit::RemoveAt(index) => {
            if index >= items.len() {
                return Err(out_of_range(kind, index, items.len()));
            }
            items.remove(index);
        }
    }
    Ok(items)
}
