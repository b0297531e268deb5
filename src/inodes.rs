use crate::{Inode, InodeId, InodeKind};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use tracing::{instrument, trace};

/// Arena owning every inode of a tree.
///
/// Parents refer to their children (and children to their parent) through
/// [`InodeId`] handles, so a node is owned exactly once - by the arena - and
/// the parent link can never dangle.
#[derive(Debug)]
pub struct Inodes {
    nodes: HashMap<InodeId, Inode>,
    next_iid: InodeId,
}

impl Inodes {
    pub fn new(root_name: &str, root_mode: u32) -> Self {
        let nodes = HashMap::from_iter([(
            InodeId::ROOT,
            Inode {
                name: root_name.to_owned(),
                kind: InodeKind::Directory,
                size: 0,
                mode: root_mode,
                id: 0,
                parent: None,
                children: Default::default(),
            },
        )]);

        Self {
            nodes,
            next_iid: InodeId::new(2),
        }
    }

    /// Allocates a new, detached inode bound to `parent`.
    ///
    /// The inode doesn't show up in `parent`'s children until it's
    /// [attached](Self::attach).
    #[instrument(skip(self))]
    pub fn create(
        &mut self,
        parent: InodeId,
        name: &str,
        kind: InodeKind,
        size: u64,
        mode: u32,
        id: u32,
    ) -> Result<InodeId> {
        self.get(parent)?;

        self.nodes
            .try_reserve(1)
            .context("couldn't allocate memory for inode")?;

        let iid = self.next_iid.fetch_add()?;

        self.nodes.insert(
            iid,
            Inode {
                name: name.to_owned(),
                kind,
                size,
                mode,
                id,
                parent: Some(parent),
                children: Default::default(),
            },
        );

        trace!("allocated inode {}", iid);

        Ok(iid)
    }

    /// Appends `child` at the end of `parent`'s children and points `child`
    /// back at `parent`.
    ///
    /// Doesn't check for duplicates - the caller must make sure `child` is
    /// detached.
    #[instrument(skip(self))]
    pub fn attach(&mut self, parent: InodeId, child: InodeId) -> Result<()> {
        self.get(child)?;

        let children = &mut self.get_mut(parent)?.children;

        children
            .try_reserve(1)
            .context("couldn't allocate memory for inode's children")?;

        children.push(child);

        self.get_mut(child)?.parent = Some(parent);

        trace!("attached inode");

        Ok(())
    }

    /// Removes `iid` from its parent's children, keeping the order of the
    /// remaining siblings.
    #[instrument(skip(self))]
    pub fn detach(&mut self, iid: InodeId) -> Result<()> {
        let Some(parent_iid) = self.resolve_parent(iid)? else {
            return Ok(());
        };

        let siblings = &mut self.get_mut(parent_iid)?.children;

        if let Some(idx) = siblings.iter().position(|sibling| *sibling == iid) {
            siblings.remove(idx);
        }

        self.get_mut(iid)?.parent = None;

        trace!("detached inode");

        Ok(())
    }

    /// Moves `iid` to the end of `new_parent`'s children.
    ///
    /// Memory for the new slot is reserved up front, so when this fails the
    /// inode stays where it was.
    #[instrument(skip(self))]
    pub fn reparent(&mut self, iid: InodeId, new_parent: InodeId) -> Result<()> {
        if self.is_ancestor_of(iid, new_parent)? {
            return Err(anyhow!("inode {} cannot become its own descendant", iid));
        }

        self.get_mut(new_parent)?
            .children
            .try_reserve(1)
            .context("couldn't allocate memory for inode's children")?;

        self.detach(iid)?;
        self.attach(new_parent, iid)
    }

    /// Detaches given inode and reclaims it together with all of its
    /// descendants (children first).
    #[instrument(skip(self))]
    pub fn free(&mut self, iid: InodeId) -> Result<()> {
        trace!("freeing inode");

        if iid.is_root() {
            return Err(anyhow!("tried to free the root inode"));
        }

        self.detach(iid)?;
        self.reclaim(iid);

        Ok(())
    }

    fn reclaim(&mut self, iid: InodeId) {
        // Breadth-first, so walking it backwards visits children before
        // their parents
        let mut order = vec![iid];
        let mut idx = 0;

        while idx < order.len() {
            if let Some(inode) = self.nodes.get(&order[idx]) {
                order.extend_from_slice(&inode.children);
            }

            idx += 1;
        }

        for iid in order.into_iter().rev() {
            self.nodes.remove(&iid);

            trace!("reclaimed inode {}", iid);
        }
    }

    pub fn get(&self, iid: InodeId) -> Result<&Inode> {
        self.nodes
            .get(&iid)
            .with_context(|| format!("inode {} is dead", iid))
    }

    pub fn get_mut(&mut self, iid: InodeId) -> Result<&mut Inode> {
        self.nodes
            .get_mut(&iid)
            .with_context(|| format!("inode {} is dead", iid))
    }

    pub fn resolve_parent(&self, iid: InodeId) -> Result<Option<InodeId>> {
        self.get(iid).map(|inode| inode.parent)
    }

    pub fn resolve_children(&self, iid: InodeId) -> Result<&[InodeId]> {
        self.get(iid).map(|inode| inode.children.as_slice())
    }

    /// Returns the first child called `name` (i.e. the earliest inserted one,
    /// if there are duplicates).
    pub fn find_child(&self, parent: InodeId, name: &str) -> Result<Option<InodeId>> {
        for &iid in self.resolve_children(parent)? {
            if self.get(iid)?.name == name {
                return Ok(Some(iid));
            }
        }

        Ok(None)
    }

    /// Returns whether `ancestor` is `iid` itself or lies on its parent chain.
    pub fn is_ancestor_of(&self, ancestor: InodeId, iid: InodeId) -> Result<bool> {
        let mut cursor = Some(iid);

        while let Some(iid) = cursor {
            if iid == ancestor {
                return Ok(true);
            }

            cursor = self.resolve_parent(iid)?;
        }

        Ok(false)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(inodes: &Inodes, iid: InodeId) -> Vec<String> {
        inodes
            .resolve_children(iid)
            .unwrap()
            .iter()
            .map(|&iid| inodes.get(iid).unwrap().name.clone())
            .collect()
    }

    fn add(inodes: &mut Inodes, parent: InodeId, name: &str) -> InodeId {
        let iid = inodes
            .create(parent, name, InodeKind::Directory, 0, 0, 0)
            .unwrap();

        inodes.attach(parent, iid).unwrap();
        iid
    }

    #[test]
    fn create_does_not_attach() {
        let mut inodes = Inodes::new("root", 0o777);

        let iid = inodes
            .create(InodeId::ROOT, "a", InodeKind::File, 0, 0o666, 0)
            .unwrap();

        assert!(names(&inodes, InodeId::ROOT).is_empty());
        assert_eq!(inodes.resolve_parent(iid).unwrap(), Some(InodeId::ROOT));
    }

    #[test]
    fn create_under_dead_parent_fails() {
        let mut inodes = Inodes::new("root", 0o777);

        let result = inodes.create(InodeId::new(42), "a", InodeKind::File, 0, 0, 0);

        assert!(result.is_err());
        assert_eq!(inodes.len(), 1);
    }

    #[test]
    fn attach_appends_at_the_end() {
        let mut inodes = Inodes::new("root", 0o777);
        let a = add(&mut inodes, InodeId::ROOT, "a");
        let b = add(&mut inodes, InodeId::ROOT, "b");

        assert_eq!(names(&inodes, InodeId::ROOT), ["a", "b"]);
        assert_eq!(inodes.resolve_children(InodeId::ROOT).unwrap(), [a, b]);
        assert_eq!(inodes.resolve_parent(b).unwrap(), Some(InodeId::ROOT));
    }

    #[test]
    fn detach_keeps_sibling_order() {
        let mut inodes = Inodes::new("root", 0o777);
        add(&mut inodes, InodeId::ROOT, "a");
        let b = add(&mut inodes, InodeId::ROOT, "b");
        add(&mut inodes, InodeId::ROOT, "c");

        inodes.detach(b).unwrap();

        assert_eq!(names(&inodes, InodeId::ROOT), ["a", "c"]);
        assert_eq!(inodes.resolve_parent(b).unwrap(), None);
    }

    #[test]
    fn reparent_moves_between_parents() {
        let mut inodes = Inodes::new("root", 0o777);
        let a = add(&mut inodes, InodeId::ROOT, "a");
        let b = add(&mut inodes, InodeId::ROOT, "b");
        let f = add(&mut inodes, a, "f");

        inodes.reparent(f, b).unwrap();

        assert!(names(&inodes, a).is_empty());
        assert_eq!(names(&inodes, b), ["f"]);
        assert_eq!(inodes.resolve_parent(f).unwrap(), Some(b));

        inodes.reparent(f, InodeId::ROOT).unwrap();

        assert!(names(&inodes, b).is_empty());
        assert_eq!(names(&inodes, InodeId::ROOT), ["a", "b", "f"]);
        assert_eq!(inodes.resolve_parent(f).unwrap(), Some(InodeId::ROOT));
    }

    #[test]
    fn free_reclaims_whole_subtree() {
        let mut inodes = Inodes::new("root", 0o777);
        let a = add(&mut inodes, InodeId::ROOT, "a");
        let b = add(&mut inodes, a, "b");
        let c = add(&mut inodes, b, "c");
        add(&mut inodes, InodeId::ROOT, "d");

        inodes.free(a).unwrap();

        assert_eq!(names(&inodes, InodeId::ROOT), ["d"]);
        assert_eq!(inodes.len(), 2);
        assert!(inodes.get(b).is_err());
        assert!(inodes.get(c).is_err());
    }

    #[test]
    fn free_handles_deep_chains() {
        let mut inodes = Inodes::new("root", 0o777);
        let top = add(&mut inodes, InodeId::ROOT, "d");
        let mut cursor = top;

        for _ in 0..200_000 {
            cursor = add(&mut inodes, cursor, "d");
        }

        inodes.free(top).unwrap();

        assert_eq!(inodes.len(), 1);
        assert!(names(&inodes, InodeId::ROOT).is_empty());
    }

    #[test]
    fn root_cannot_be_freed() {
        let mut inodes = Inodes::new("root", 0o777);

        assert!(inodes.free(InodeId::ROOT).is_err());
        assert_eq!(inodes.len(), 1);
    }

    #[test]
    fn find_child_returns_earliest_match() {
        let mut inodes = Inodes::new("root", 0o777);
        let first = add(&mut inodes, InodeId::ROOT, "dup");
        add(&mut inodes, InodeId::ROOT, "dup");

        assert_eq!(
            inodes.find_child(InodeId::ROOT, "dup").unwrap(),
            Some(first)
        );
        assert_eq!(inodes.find_child(InodeId::ROOT, "nope").unwrap(), None);
    }

    #[test]
    fn ancestry() {
        let mut inodes = Inodes::new("root", 0o777);
        let a = add(&mut inodes, InodeId::ROOT, "a");
        let b = add(&mut inodes, a, "b");
        let c = add(&mut inodes, InodeId::ROOT, "c");

        assert!(inodes.is_ancestor_of(a, b).unwrap());
        assert!(inodes.is_ancestor_of(b, b).unwrap());
        assert!(inodes.is_ancestor_of(InodeId::ROOT, b).unwrap());
        assert!(!inodes.is_ancestor_of(b, a).unwrap());
        assert!(!inodes.is_ancestor_of(c, b).unwrap());
    }
}
