#![allow(dead_code)]

use std::sync::Arc;

use treemodel::{ChildList, DomainError, DomainResult, ModelRef, TreeModel};

/// Labelled model embedding the reference child list.
#[derive(Debug, Default)]
pub struct ModelData {
    pub data: String,
    children: ChildList,
}

impl TreeModel for ModelData {
    fn display_label(&self) -> String {
        self.data.clone()
    }

    fn child_list(&self) -> &ChildList {
        &self.children
    }
}

pub fn model(label: &str) -> ModelRef {
    Arc::new(ModelData {
        data: label.to_string(),
        children: ChildList::new(),
    })
}

/// Model that refuses children beyond `max`.
#[derive(Debug)]
pub struct Capped {
    max: usize,
    children: ChildList,
}

impl TreeModel for Capped {
    fn display_label(&self) -> String {
        format!("capped({})", self.max)
    }

    fn child_list(&self) -> &ChildList {
        &self.children
    }

    fn add_child(&self, child: ModelRef) -> DomainResult<()> {
        self.check_capacity()?;
        self.children.push(child);
        Ok(())
    }

    fn add_child_at(&self, index: usize, child: ModelRef) -> DomainResult<()> {
        self.check_capacity()?;
        self.children.insert(index, child)
    }
}

impl Capped {
    fn check_capacity(&self) -> DomainResult<()> {
        if self.children.len() >= self.max {
            return Err(DomainError::Rejected {
                reason: format!("capacity {} reached", self.max),
            });
        }
        Ok(())
    }
}

pub fn capped(max: usize) -> ModelRef {
    Arc::new(Capped {
        max,
        children: ChildList::new(),
    })
}

pub fn labels(models: &[ModelRef]) -> Vec<String> {
    models.iter().map(|m| m.display_label()).collect()
}
